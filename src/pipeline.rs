use crate::config::Config;
use crate::constants;
use crate::error::{DataLakeError, Result};
use crate::ingest::{ingest_data, sha256_file};
use crate::layers::{perform_data_operations, Layer};
use crate::reader::read_data;
use crate::frame::write_csv;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// One layer's output for one source file
#[derive(Debug, Clone, Serialize)]
pub struct LayerOutput {
    pub layer: Layer,
    pub path: String,
    pub rows: usize,
    pub columns: usize,
}

/// Everything the pipeline produced for one source file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file_name: String,
    pub raw_path: String,
    pub raw_sha256: String,
    pub raw_rows: usize,
    pub outputs: Vec<LayerOutput>,
}

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<FileReport>,
    pub report_file: Option<String>,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create the directory of every layer under the data lake root
    pub fn prepare_layers(&self) -> Result<()> {
        for layer in Layer::ALL {
            let path = self.config.layer_path(layer.dir_name());
            fs::create_dir_all(&path)?;
            debug!("Layer directory ready: {}", path.display());
        }
        Ok(())
    }

    /// `.csv` and `.json` files of the data directory, sorted by file name
    pub fn discover_sources(&self) -> Result<Vec<PathBuf>> {
        let data_path = self.config.data_path();
        if !data_path.is_dir() {
            return Err(DataLakeError::SourceNotFound(data_path));
        }

        let mut sources = Vec::new();
        for entry in fs::read_dir(&data_path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if constants::is_supported_extension(name) {
                sources.push(entry.path());
            }
        }
        sources.sort();
        Ok(sources)
    }

    /// Run every source file through all layers. The first failure aborts the run.
    #[instrument(skip(self), fields(lake = %self.config.data_lake_path().display()))]
    pub fn run(&self) -> Result<PipelineResult> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let t_run = std::time::Instant::now();
        info!(%run_id, "🚀 Starting data lake pipeline");
        counter!("data_lake_pipeline_runs_total").increment(1);

        self.prepare_layers()?;
        let sources = self.discover_sources()?;
        info!("📂 Found {} source files", sources.len());

        let mut files = Vec::with_capacity(sources.len());
        for source in &sources {
            files.push(self.process_file(source)?);
        }

        histogram!("data_lake_pipeline_duration_seconds").record(t_run.elapsed().as_secs_f64());

        let mut result = PipelineResult {
            run_id,
            started_at,
            finished_at: Utc::now(),
            files,
            report_file: None,
        };
        let report = self.persist_report(&result)?;
        info!("💾 Saved run report to {}", report);
        result.report_file = Some(report);

        info!("✅ Data processing pipeline complete.");
        println!("✅ Data processing pipeline complete.");
        Ok(result)
    }

    /// Copy one source into the raw layer and write each processed layer
    #[instrument(skip(self), fields(file = %source.display()))]
    pub fn process_file(&self, source: &Path) -> Result<FileReport> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DataLakeError::NotFileOrDirectory(source.to_path_buf()))?
            .to_string();

        let raw_dir = self.config.layer_path(Layer::Raw.dir_name());
        let raw_file = ingest_data(source, &raw_dir)?;
        let raw_sha256 = sha256_file(&raw_file)?;

        let mut data = read_data(&raw_file)?;
        let raw_rows = data.height();
        counter!("data_lake_files_processed_total").increment(1);

        let mut outputs = Vec::with_capacity(Layer::PROCESSING.len());
        for layer in Layer::PROCESSING {
            data = perform_data_operations(&data, layer)?;
            let output = self.config.layer_path(layer.dir_name()).join(&file_name);
            write_csv(&data, &output)?;
            counter!("data_lake_rows_written_total", "layer" => layer.dir_name())
                .increment(data.height() as u64);
            info!("Saved {} data to {}", layer, output.display());
            println!("Saved {} data to {}", layer, output.display());
            outputs.push(LayerOutput {
                layer,
                path: output.to_string_lossy().to_string(),
                rows: data.height(),
                columns: data.width(),
            });
        }

        Ok(FileReport {
            file_name,
            raw_path: raw_file.to_string_lossy().to_string(),
            raw_sha256,
            raw_rows,
            outputs,
        })
    }

    /// Apply a single layer to one input file and write the result as CSV
    pub fn run_layer(input: &Path, layer: Layer, output: &Path) -> Result<DataFrame> {
        let data = read_data(input)?;
        let result = perform_data_operations(&data, layer)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_csv(&result, output)?;
        info!("Saved {} data to {}", layer, output.display());
        println!("Saved {} data to {}", layer, output.display());
        Ok(result)
    }

    /// Persist the run result to a timestamped JSON file under `runs/`
    fn persist_report(&self, result: &PipelineResult) -> Result<String> {
        let runs_dir = self.config.runs_path();
        fs::create_dir_all(&runs_dir)?;

        let timestamp = result.started_at.format("%Y%m%d_%H%M%S");
        let run_id = result.run_id.simple().to_string();
        let filepath = runs_dir.join(format!("run_{}_{}.json", timestamp, &run_id[..8]));

        let json_content = serde_json::to_string_pretty(result)?;
        fs::write(&filepath, json_content)?;
        Ok(filepath.to_string_lossy().to_string())
    }
}
