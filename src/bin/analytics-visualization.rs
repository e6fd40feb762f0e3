use anyhow::Result;
use clap::Parser;
use data_lake::analytics;
use data_lake::config::Config;
use data_lake::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "analytics-visualization")]
#[command(about = "Chart the transformed layer of the data lake")]
struct Args {
    /// Transformed CSV; defaults to `visualization.csv_path` from config.toml
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let args = Args::parse();
    let csv = match args.csv {
        Some(path) => path,
        None => Config::load(None)?.visualization_csv(),
    };

    analytics::run_visualization(&csv)?;
    Ok(())
}
