//! End-to-end runs of both pipelines over the same CSV directory.

use parallel_sales::analysis::app::SalesAnalysis;
use parallel_sales::config::AnalysisConfig;
use parallel_sales::io::reader::read_all_from_directory;
use parallel_sales::job::local::LocalJob;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const HEADER: &str = "transaction_id,product_id,category,price,quantity";

fn generate_inputs(dir: &Path, files: usize, rows_per_file: usize) {
    std::fs::create_dir_all(dir).unwrap();
    let categories = ["Electronics", "Books", "Clothing", "Toys", "Garden", "Sports"];

    for file in 0..files {
        let mut content = String::from(HEADER);
        for row in 0..rows_per_file {
            let id = file * rows_per_file + row;
            let category = categories[id % categories.len()];
            let price = format!("{}.{:02}", (id * 7) % 500, (id * 13) % 100);
            let quantity = id % 9;
            content.push_str(&format!("\n{},{},{},{},{}", id, id % 50, category, price, quantity));
        }
        // One malformed row per file
        content.push_str("\nnot,a,valid,row,at-all");
        std::fs::write(dir.join(format!("{}.csv", file)), content).unwrap();
    }
}

#[tokio::test]
async fn analysis_and_local_job_agree() {
    // ARRANGE
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    generate_inputs(&input, 3, 400);

    let config = AnalysisConfig {
        input_dir: input.clone(),
        result_file: dir.path().join("output/result.txt"),
        performance_file: dir.path().join("output/performance.csv"),
        ..AnalysisConfig::default()
    };

    // ACT: in-memory analysis
    let records = read_all_from_directory(&input).unwrap();
    assert_eq!(records.len(), 1200);

    let analysis = SalesAnalysis::new(config.clone());
    let outcome = analysis
        .run_single_analysis(Arc::new(records), 3, 2)
        .await
        .unwrap();

    // ACT: local job
    let mut job_config = config.clone();
    job_config.job.output_dir = dir.path().join("output/job");
    job_config.job.reduce_partitions = 2;
    let report = LocalJob::from_config(&job_config).run().await.unwrap();

    // ASSERT
    assert_eq!(report.map_tasks, 3);
    assert_eq!(report.input_records, 1200);
    assert_eq!(report.malformed_records, 3);
    assert_eq!(report.output_groups, outcome.rows.len());

    let mut job_rows: HashMap<String, (String, i64)> = HashMap::new();
    for file in &report.output_files {
        for line in std::fs::read_to_string(file).unwrap().lines() {
            let fields: Vec<&str> = line.split('\t').collect();
            job_rows.insert(
                fields[0].to_string(),
                (fields[1].to_string(), fields[2].parse().unwrap()),
            );
        }
    }

    for (category, stats) in &outcome.rows {
        let (revenue, quantity) = &job_rows[category];
        assert_eq!(*quantity, stats.total_quantity, "quantity of {}", category);
        assert_eq!(revenue, &stats.revenue_display(), "revenue of {}", category);
    }
}

#[tokio::test]
async fn experiments_write_one_row_per_profile_pair() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    generate_inputs(&input, 2, 50);

    let config = AnalysisConfig {
        input_dir: input.clone(),
        result_file: dir.path().join("result.txt"),
        performance_file: dir.path().join("performance.csv"),
        ..AnalysisConfig::default()
    };

    let records = Arc::new(read_all_from_directory(&input).unwrap());
    let analysis = SalesAnalysis::new(config.clone());
    let samples = analysis
        .run_performance_experiments(
            records,
            &config.map_thread_profiles,
            &config.reduce_thread_profiles,
        )
        .await
        .unwrap();

    assert_eq!(samples.len(), 16);
    let csv = std::fs::read_to_string(&config.performance_file).unwrap();
    assert_eq!(csv.lines().count(), 17);
    assert_eq!(csv.lines().last().unwrap().split(',').take(2).collect::<Vec<_>>(), vec!["8", "8"]);
}
