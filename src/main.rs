use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use data_lake::analytics;
use data_lake::config::Config;
use data_lake::ingest::ingest_data;
use data_lake::layers::Layer;
use data_lake::logging;
use data_lake::pipeline::Pipeline;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "data_lake")]
#[command(about = "Layered data lake pipeline for the Titanic passenger dataset")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project root holding the `data` and `data_lake` directories
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every data file through raw, refined, curated, enriched and transformed
    Run,
    /// Copy a file or directory into a destination directory
    Ingest {
        src: PathBuf,
        dest: PathBuf,
    },
    /// Apply a single layer's operations to one file
    Layer {
        /// One of: raw, refined, curated, enriched, transformed
        layer: String,
        input: PathBuf,
        output: PathBuf,
    },
    /// Print a dataset overview and render charts from the transformed layer
    Visualize {
        /// Transformed CSV to chart (defaults to the configured path)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Run => {
            println!("🚀 Running data lake pipeline...");
            let result = Pipeline::new(config).run()?;
            println!("\n📊 Pipeline Results:");
            println!("   Files processed: {}", result.files.len());
            for file in &result.files {
                println!("   - {} ({} raw rows)", file.file_name, file.raw_rows);
            }
            if let Some(report) = &result.report_file {
                println!("   Report: {}", report);
            }
        }
        Commands::Ingest { src, dest } => {
            let copied = ingest_data(&src, &dest)?;
            info!("Ingested into {}", copied.display());
        }
        Commands::Layer { layer, input, output } => {
            let layer: Layer = layer.parse()?;
            let frame = Pipeline::run_layer(&input, layer, &output)
                .with_context(|| format!("{} layer failed for {}", layer, input.display()))?;
            println!("✅ {} rows, {} columns", frame.height(), frame.width());
        }
        Commands::Visualize { csv } => {
            let csv = csv.unwrap_or_else(|| config.visualization_csv());
            let written = analytics::run_visualization(&csv)?;
            info!("Rendered {} charts", written.len());
        }
    }
    Ok(())
}

/// Resolve the configuration and run the command. Every failure here is
/// reported as a pipeline error by `main`.
fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config = config.with_project_root(root);
    }
    dispatch(cli.command, config)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("Error in pipeline: {:#}", e);
        println!("Error in pipeline: {}", e);
        return Err(e);
    }
    Ok(())
}
