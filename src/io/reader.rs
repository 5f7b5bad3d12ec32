//! Sales CSV Reader
//!
//! Loads `SalesRecord`s from CSV files. Malformed lines never abort a load: they are logged
//! with the parse reason and skipped.

use crate::error::ReadError;
use crate::model::SalesRecord;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads every `*.csv` file (extension matched case-insensitively) directly inside `directory`.
///
/// Files are read in file-name order so that record order is reproducible across runs.
pub fn read_all_from_directory(directory: impl AsRef<Path>) -> Result<Vec<SalesRecord>, ReadError> {
    let directory = directory.as_ref();
    ensure_directory(directory)?;

    let mut files = csv_files(directory)?;
    files.sort();

    let mut records = Vec::new();
    for path in files {
        tracing::info!("Reading CSV file: {}", path.display());
        read_file_into(&path, &mut records)?;
    }

    Ok(records)
}

/// Reads `0.csv`, `1.csv`, ... `(count - 1).csv` from `directory`.
pub fn read_numbered_files(
    directory: impl AsRef<Path>,
    count: usize,
) -> Result<Vec<SalesRecord>, ReadError> {
    let directory = directory.as_ref();
    ensure_directory(directory)?;

    let mut records = Vec::new();
    for index in 0..count {
        let path = directory.join(format!("{}.csv", index));
        if !path.is_file() {
            return Err(ReadError::MissingFile(path));
        }
        tracing::info!("Reading CSV file: {}", path.display());
        read_file_into(&path, &mut records)?;
    }

    Ok(records)
}

/// Parses records from any buffered reader.
pub fn read_records<R: BufRead>(reader: R) -> std::io::Result<Vec<SalesRecord>> {
    let mut records = Vec::new();
    read_lines_into(reader, &mut records)?;
    Ok(records)
}

/// Returns `true` for paths ending in `.csv`, ignoring case.
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn ensure_directory(directory: &Path) -> Result<(), ReadError> {
    if !directory.exists() {
        return Err(ReadError::DirectoryNotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(ReadError::NotADirectory(directory.to_path_buf()));
    }
    Ok(())
}

fn csv_files(directory: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let io_error = |source| ReadError::Io {
        path: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && is_csv_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn read_file_into(path: &Path, target: &mut Vec<SalesRecord>) -> Result<(), ReadError> {
    let io_error = |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    read_lines_into(BufReader::new(file), target).map_err(io_error)
}

fn read_lines_into<R: BufRead>(reader: R, target: &mut Vec<SalesRecord>) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match SalesRecord::from_csv_line(trimmed) {
            Ok(Some(record)) => target.push(record),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to parse CSV line: '{}'. Reason: {}", trimmed, e);
            }
        }
    }
    Ok(())
}
