use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLakeError {
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Source path is neither a file nor a directory: {}", .0.display())]
    NotFileOrDirectory(PathBuf),

    #[error("File is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("File contains no data (empty DataFrame): {}", .0.display())]
    NoData(PathBuf),

    #[error("File is empty or corrupted: {}", .0.display())]
    EmptyOrCorrupted(PathBuf),

    #[error("File is not a valid CSV or JSON: {}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Unsupported file format. Please use .csv or .json files.")]
    UnsupportedFormat(PathBuf),

    #[error("Error reading file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DataLakeError>;
