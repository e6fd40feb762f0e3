use super::{format_cell, unique_headers, upcast_nullable_ints, FrameError};
use crate::constants::NA_TOKENS;
use csv::{ReaderBuilder, WriterBuilder};
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

/// Parse CSV text with a header row. Every row takes part in dtype inference,
/// pandas' NA tokens read as missing, and repeated header names are numbered.
pub fn read_csv_str(content: &str) -> Result<DataFrame, FrameError> {
    if content.trim().is_empty() {
        return Err(FrameError::NoColumns);
    }

    let headers = header_row(content)?;
    if headers.is_empty() {
        return Err(FrameError::NoColumns);
    }

    let na_tokens: Vec<PlSmallStr> = NA_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(move |opts| {
            opts.with_null_values(Some(NullValues::AllColumns(na_tokens.clone())))
        })
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()?;

    if df.width() != headers.len() {
        return Err(FrameError::Malformed(format!(
            "Expected {} columns from the header, parsed {}",
            headers.len(),
            df.width()
        )));
    }

    // The header as written, made unique the way pandas does it
    let columns: Vec<Column> = df
        .take_columns()
        .into_iter()
        .zip(unique_headers(headers))
        .map(|(column, name)| column.with_name(name.into()))
        .collect();
    Ok(upcast_nullable_ints(DataFrame::new(columns)?)?)
}

fn header_row(content: &str) -> Result<Vec<String>, FrameError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| FrameError::Malformed(format!("Failed to read CSV headers: {e}")))?;
    Ok(headers.iter().map(|h| h.to_string()).collect())
}

/// Write the frame as CSV with a header row and no index column.
pub fn write_csv_to<W: Write>(df: &DataFrame, writer: W) -> crate::error::Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(df.get_column_names().iter().map(|n| n.as_str()))?;

    let columns = df.get_columns();
    for row in 0..df.height() {
        let record = columns
            .iter()
            .map(|column| column.get(row).map(|v| format_cell(&v)))
            .collect::<PolarsResult<Vec<String>>>()?;
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(df: &DataFrame, path: &Path) -> crate::error::Result<()> {
    let file = File::create(path)?;
    write_csv_to(df, file)
}
