// crates/fondef/src/main.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fondef_core::config::{Config, ERA_A_HEADER_ROW, ERA_A_OUTPUT, ERA_B_OUTPUT};
use fondef_core::extract::CsvExtractor;
use fondef_core::load::CsvLoader;
use fondef_core::pipeline::EtlPipeline;
use fondef_core::report::generate_report;
use fondef_core::transform::{CleaningTransformer, Fondef2000Transformer, Fondef2012Transformer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Batch ETL for the Fondef research-grant exports.
#[derive(Parser, Debug)]
#[command(author, version, about = "Batch ETL for Fondef research-grant exports", long_about = None)]
struct Cli {
    /// Optional TOML file overriding the data directories
    #[arg(long, default_value = "fondef.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run both era pipelines over the raw exports
    Process,
    /// Rebuild the projects-per-year chart from the processed outputs
    Report,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Some(Command::Process) => run_pipelines(&config)?,
        Some(Command::Report) => run_report(&config),
        None => {
            run_pipelines(&config)?;
            run_report(&config);
        }
    }

    Ok(())
}

/// Runs the two era pipelines in order. A missing source file only skips its
/// own pipeline; the other still runs.
fn run_pipelines(config: &Config) -> Result<()> {
    let era_a = config.era_a_source();
    if era_a.exists() {
        let pipeline = EtlPipeline::new(
            Box::new(CsvExtractor::new(&era_a).with_header_row(ERA_A_HEADER_ROW)),
            vec![Box::new(Fondef2000Transformer), Box::new(CleaningTransformer)],
            Box::new(CsvLoader::new(&config.processed_data_dir)),
        );
        pipeline.run(ERA_A_OUTPUT)?;
    } else {
        warn!(path = %era_a.display(), "source file not found, skipping pipeline");
    }

    let era_b = config.era_b_source();
    if era_b.exists() {
        let pipeline = EtlPipeline::new(
            Box::new(CsvExtractor::new(&era_b)),
            vec![Box::new(Fondef2012Transformer), Box::new(CleaningTransformer)],
            Box::new(CsvLoader::new(&config.processed_data_dir)),
        );
        pipeline.run(ERA_B_OUTPUT)?;
    } else {
        warn!(path = %era_b.display(), "source file not found, skipping pipeline");
    }

    Ok(())
}

/// Report failures are printed, not propagated; the chart is a best-effort
/// artifact downstream of the pipelines.
fn run_report(config: &Config) {
    match generate_report(config) {
        Ok(path) => info!(path = %path.display(), "chart ready"),
        Err(error) => println!("Error: {error}"),
    }
}
