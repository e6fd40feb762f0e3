//! Polars frame helpers shared by the reader, the layers and the analytics.
//!
//! Frames follow pandas conventions once loaded: integer columns with gaps
//! become floats, and CSV output spells booleans and floats the way pandas
//! writes them.

pub mod csv_io;
pub mod json_io;

use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

pub use csv_io::{read_csv_str, write_csv, write_csv_to};
pub use json_io::read_json_str;

/// Failures while turning text into a frame
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("no columns to parse")]
    NoColumns,

    #[error("malformed input: {0}")]
    Malformed(String),
}

impl From<PolarsError> for FrameError {
    fn from(e: PolarsError) -> Self {
        FrameError::Malformed(e.to_string())
    }
}

/// Formats a float the way Python's `repr` does: integral values keep a
/// trailing `.0`, and very small or very large magnitudes switch to
/// exponent notation with a signed, two-digit exponent.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{v:e}");
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        let exponent: i32 = exponent.parse().unwrap_or(0);
        if !(-4..16).contains(&exponent) {
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!("{mantissa}e{sign}{:02}", exponent.abs());
        }
    }

    let plain = v.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// Text written to a CSV field
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(true) => "True".to_string(),
        AnyValue::Boolean(false) => "False".to_string(),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(f64::from(*v)),
        other => match other.get_str() {
            Some(s) => s.to_string(),
            None => other.to_string(),
        },
    }
}

pub fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}

/// pandas dtype name for a column
pub fn pandas_dtype(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Boolean => "bool",
        d if d.is_integer() => "int64",
        d if d.is_float() => "float64",
        DataType::Null => "float64",
        _ => "object",
    }
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}

/// A column as floats; values that do not convert are missing
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let floats = df.column(name)?.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().collect())
}

/// A column as CSV field text
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let column = df.column(name)?;
    (0..column.len())
        .map(|i| column.get(i).map(|v| format_cell(&v)))
        .collect()
}

/// pandas-style unique column names: a repeated `a` becomes `a.1`, `a.2`, ...
/// and a blank header becomes `Unnamed: <position>`.
pub fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());
    for (position, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {position}")
        } else {
            header
        };
        let mut name = base.clone();
        let mut suffix = 0;
        while used.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}

/// Integer columns with missing values, and columns with nothing but missing
/// values, are stored as floats.
pub fn upcast_nullable_ints(df: DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .take_columns()
        .into_iter()
        .map(|column| {
            let nulls = column.null_count();
            let all_missing = column.len() > 0 && nulls == column.len();
            if (column.dtype().is_integer() && nulls > 0)
                || all_missing
                || column.dtype() == &DataType::Null
            {
                column.cast(&DataType::Float64)
            } else {
                Ok(column)
            }
        })
        .collect::<PolarsResult<Vec<_>>>()?;
    DataFrame::new(columns)
}
