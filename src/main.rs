use clap::{Args, Parser, Subcommand};
use parallel_sales::analysis::app::SalesAnalysis;
use parallel_sales::config::AnalysisConfig;
use parallel_sales::io::reader::{read_all_from_directory, read_numbered_files};
use parallel_sales::job::local::LocalJob;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parallel-sales")]
#[command(about = "Per-category sales totals over CSV files with a parallel MapReduce pipeline")]
#[command(version)]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the in-memory analysis and the thread-profile experiments
    Analyze(AnalyzeArgs),
    /// Run the local file-to-file job
    Job(JobArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Read only 0.csv .. (N-1).csv instead of every CSV file
    #[arg(long)]
    files: Option<usize>,

    #[arg(long)]
    result_file: Option<PathBuf>,

    #[arg(long)]
    performance_file: Option<PathBuf>,

    #[arg(long)]
    map_threads: Option<usize>,

    #[arg(long)]
    reduce_threads: Option<usize>,

    /// Map thread counts for the experiments, e.g. 1,2,4,8
    #[arg(long, value_delimiter = ',')]
    map_profile: Option<Vec<usize>>,

    /// Reduce thread counts for the experiments, e.g. 1,2,4,8
    #[arg(long, value_delimiter = ',')]
    reduce_profile: Option<Vec<usize>>,

    /// Only run the single analysis
    #[arg(long)]
    skip_experiments: bool,
}

#[derive(Args)]
struct JobArgs {
    #[arg(long)]
    input_dir: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    reduce_partitions: Option<usize>,

    #[arg(long)]
    map_slots: Option<usize>,
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parallel_sales=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("parallel-sales failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Command::Analyze(args) => {
            let files = args.files;
            let skip_experiments = args.skip_experiments;
            apply_analyze_args(&mut config, args);
            config.validate()?;
            analyze(config, files, skip_experiments).await
        }
        Command::Job(args) => {
            apply_job_args(&mut config, args);
            config.validate()?;

            let report = LocalJob::from_config(&config).run().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn analyze(
    config: AnalysisConfig,
    files: Option<usize>,
    skip_experiments: bool,
) -> anyhow::Result<()> {
    let records = match files {
        Some(count) => read_numbered_files(&config.input_dir, count)?,
        None => read_all_from_directory(&config.input_dir)?,
    };
    tracing::info!(
        "Loaded {} sales records from '{}'",
        records.len(),
        config.input_dir.display()
    );
    let records = Arc::new(records);

    let analysis = SalesAnalysis::new(config.clone());
    analysis
        .run_single_analysis(records.clone(), config.map_threads, config.reduce_threads)
        .await?;

    if !skip_experiments {
        analysis
            .run_performance_experiments(
                records,
                &config.map_thread_profiles,
                &config.reduce_thread_profiles,
            )
            .await?;
    }

    Ok(())
}

fn apply_analyze_args(config: &mut AnalysisConfig, args: AnalyzeArgs) {
    if let Some(dir) = args.input_dir {
        config.input_dir = dir;
    }
    if let Some(path) = args.result_file {
        config.result_file = path;
    }
    if let Some(path) = args.performance_file {
        config.performance_file = path;
    }
    if let Some(threads) = args.map_threads {
        config.map_threads = threads;
    }
    if let Some(threads) = args.reduce_threads {
        config.reduce_threads = threads;
    }
    if let Some(profile) = args.map_profile {
        config.map_thread_profiles = profile;
    }
    if let Some(profile) = args.reduce_profile {
        config.reduce_thread_profiles = profile;
    }
}

fn apply_job_args(config: &mut AnalysisConfig, args: JobArgs) {
    if let Some(dir) = args.input_dir {
        config.job.input_dir = Some(dir);
    }
    if let Some(dir) = args.output_dir {
        config.job.output_dir = dir;
    }
    if let Some(partitions) = args.reduce_partitions {
        config.job.reduce_partitions = partitions;
    }
    if let Some(slots) = args.map_slots {
        config.job.map_slots = slots;
    }
}
