//! Analysis of the transformed layer: overview statistics and charts.

pub mod charts;
pub mod summary;

use crate::constants::{EMBARKED, PCLASS, SURVIVAL_RATE, VISUALIZATIONS_DIR};
use crate::error::{DataLakeError, Result};
use crate::frame::{format_cell, has_column, is_numeric};
use crate::reader::read_data;
use polars::lazy::dsl::pearson_corr;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use charts::render_charts;
pub use summary::DatasetSummary;

/// Load the transformed-layer CSV the charts are built from
pub fn load_transformed(path: &Path) -> Result<DataFrame> {
    read_data(path)
}

/// `visualizations/` next to the analysed CSV
pub fn output_dir_for(csv_path: &Path) -> PathBuf {
    csv_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(VISUALIZATIONS_DIR)
}

/// Print the dataset overview and write every chart next to `csv_path`.
pub fn run_visualization(csv_path: &Path) -> Result<Vec<PathBuf>> {
    let df = load_transformed(csv_path)?;

    let overview = DatasetSummary::from_frame(&df)?;
    println!("{overview}");
    for stats in &overview.describe {
        debug!("{}", summary::one_line(stats));
    }

    let out_dir = output_dir_for(csv_path);
    let written = render_charts(&df, &out_dir)?;
    info!("✅ Visualizations saved to: {}", out_dir.display());
    println!("\n✅ Visualizations saved to: {}", out_dir.display());
    Ok(written)
}

fn require_column(df: &DataFrame, name: &str) -> Result<()> {
    if has_column(df, name) {
        Ok(())
    } else {
        Err(DataLakeError::MissingColumn(name.to_string()))
    }
}

/// Average of `value` for each category of `key`.
///
/// Numeric categories are sorted; text categories keep their first-seen order.
/// Categories without any numeric value are left out.
pub fn mean_by(df: &DataFrame, key: &str, value: &str) -> Result<Vec<(String, f64)>> {
    require_column(df, key)?;
    require_column(df, value)?;

    let mut grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg([col(value).cast(DataType::Float64).mean()]);
    if is_numeric(df.column(key)?.dtype()) {
        grouped = grouped.sort([key], SortMultipleOptions::default());
    }
    let grouped = grouped.collect()?;

    let keys = grouped.column(key)?;
    let means = grouped.column(value)?.f64()?;
    let mut bars = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        if let Some(mean) = means.get(i) {
            bars.push((format_cell(&keys.get(i)?), mean));
        }
    }
    Ok(bars)
}

/// Pearson correlation between every pair of `columns`, using rows where both
/// values are present. Undefined coefficients are NaN.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    for name in columns {
        require_column(df, name)?;
    }

    let mut matrix = Vec::with_capacity(columns.len());
    for a in columns {
        let mut row = Vec::with_capacity(columns.len());
        for b in columns {
            row.push(pearson(df, a, b)?);
        }
        matrix.push(row);
    }
    Ok(matrix)
}

fn pearson(df: &DataFrame, a: &str, b: &str) -> Result<f64> {
    let pairs = df
        .clone()
        .lazy()
        .select([
            col(a).cast(DataType::Float64).alias("x"),
            col(b).cast(DataType::Float64).alias("y"),
        ])
        .drop_nulls(None)
        .collect()?;
    if pairs.height() < 2 {
        return Ok(f64::NAN);
    }

    let r = pairs
        .lazy()
        .select([pearson_corr(col("x"), col("y")).alias("r")])
        .collect()?;
    Ok(r.column("r")?.f64()?.get(0).unwrap_or(f64::NAN))
}

/// Mean survival rate laid out as a class × port grid
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalGrid {
    pub classes: Vec<String>,
    pub ports: Vec<String>,
    /// `cells[class][port]`; `None` where no passengers matched
    pub cells: Vec<Vec<Option<f64>>>,
}

pub fn survival_grid(df: &DataFrame) -> Result<SurvivalGrid> {
    require_column(df, PCLASS)?;
    require_column(df, EMBARKED)?;
    require_column(df, SURVIVAL_RATE)?;

    let classes: Vec<String> = mean_by(df, PCLASS, SURVIVAL_RATE)?
        .into_iter()
        .map(|(k, _)| k)
        .collect();

    let grouped = df
        .clone()
        .lazy()
        .filter(col(PCLASS).is_not_null().and(col(EMBARKED).is_not_null()))
        .group_by([col(PCLASS), col(EMBARKED)])
        .agg([col(SURVIVAL_RATE).cast(DataType::Float64).mean()])
        .collect()?;

    let class_keys = grouped.column(PCLASS)?;
    let port_keys = grouped.column(EMBARKED)?;
    let rates = grouped.column(SURVIVAL_RATE)?.f64()?;
    let mut lookup: HashMap<(String, String), f64> = HashMap::new();
    let mut ports: Vec<String> = Vec::new();
    for i in 0..grouped.height() {
        let port = format_cell(&port_keys.get(i)?);
        if !ports.contains(&port) {
            ports.push(port.clone());
        }
        if let Some(rate) = rates.get(i) {
            lookup.insert((format_cell(&class_keys.get(i)?), port), rate);
        }
    }
    ports.sort();

    let cells = classes
        .iter()
        .map(|class| {
            ports
                .iter()
                .map(|port| lookup.get(&(class.clone(), port.clone())).copied())
                .collect()
        })
        .collect();

    Ok(SurvivalGrid { classes, ports, cells })
}
