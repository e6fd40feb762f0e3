use crate::error::{DataLakeError, Result};
use crate::frame::{read_csv_str, read_json_str, FrameError};
use polars::prelude::DataFrame;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Some(FileFormat::Csv),
            Some("json") => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Read a CSV or JSON file into a frame.
///
/// JSON files whose content is really comma-separated text (not starting with
/// `{` or `[`) are parsed as CSV.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_data(path: &Path) -> Result<DataFrame> {
    info!("Reading data from {}", path.display());
    println!("Reading data from {}", path.display());

    if !path.exists() {
        return Err(DataLakeError::NotFound(path.to_path_buf()));
    }
    let size = fs::metadata(path)?.len();
    if size == 0 {
        return Err(DataLakeError::EmptyFile(path.to_path_buf()));
    }

    let format = FileFormat::from_path(path)
        .ok_or_else(|| DataLakeError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| DataLakeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = match format {
        FileFormat::Csv => read_csv_str(&content),
        FileFormat::Json => {
            let trimmed = content.trim();
            if looks_like_csv(trimmed) {
                debug!("JSON file holds comma-separated text; parsing as CSV");
                read_csv_str(trimmed)
            } else {
                read_json_str(trimmed)
            }
        }
    };

    let df = parsed.map_err(|e| match e {
        FrameError::NoColumns => DataLakeError::EmptyOrCorrupted(path.to_path_buf()),
        FrameError::Malformed(reason) => DataLakeError::InvalidFormat {
            path: path.to_path_buf(),
            reason,
        },
    })?;

    if df.height() == 0 {
        return Err(DataLakeError::NoData(path.to_path_buf()));
    }
    debug!(rows = df.height(), columns = df.width(), "Loaded frame");
    Ok(df)
}

fn looks_like_csv(content: &str) -> bool {
    !content.is_empty() && content.contains(',') && !content.starts_with('{') && !content.starts_with('[')
}
