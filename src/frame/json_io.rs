use super::{upcast_nullable_ints, FrameError};
use polars::prelude::*;
use serde_json::{Map, Value as Json};

/// Parse JSON into a frame. Accepted shapes:
/// - records: `[{"col": v, ...}, ...]`
/// - rows:    `[[v, v], ...]` or `[v, v, ...]`, with numbered columns
/// - columns: `{"col": {"0": v, "1": v}, ...}`
/// - lists:   `{"col": [v, v], ...}`
pub fn read_json_str(content: &str) -> Result<DataFrame, FrameError> {
    let parsed: Json =
        serde_json::from_str(content).map_err(|e| FrameError::Malformed(e.to_string()))?;

    let (names, cells) = match parsed {
        Json::Array(items) => from_records(items),
        Json::Object(map) => from_columns(map)?,
        _ => {
            return Err(FrameError::Malformed(
                "expected a JSON array or object at the top level".to_string(),
            ))
        }
    };

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| build_column(&name, values))
        .collect::<PolarsResult<Vec<_>>>()?;
    Ok(upcast_nullable_ints(DataFrame::new(columns)?)?)
}

type RawColumns = (Vec<String>, Vec<Vec<Json>>);

fn from_records(items: Vec<Json>) -> RawColumns {
    let mut names: Vec<String> = Vec::new();
    let records: Vec<Map<String, Json>> = items
        .into_iter()
        .map(|item| {
            let record: Map<String, Json> = match item {
                Json::Object(obj) => obj,
                // Positional rows get numbered columns
                Json::Array(values) => values
                    .into_iter()
                    .enumerate()
                    .map(|(idx, v)| (idx.to_string(), v))
                    .collect(),
                scalar => std::iter::once(("0".to_string(), scalar)).collect(),
            };
            for key in record.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
            record
        })
        .collect();

    let cells = names
        .iter()
        .map(|name| {
            records
                .iter()
                .map(|rec| rec.get(name).cloned().unwrap_or(Json::Null))
                .collect()
        })
        .collect();
    (names, cells)
}

fn from_columns(map: Map<String, Json>) -> Result<RawColumns, FrameError> {
    // Row labels in first-seen order across all columns
    let mut index: Vec<String> = Vec::new();
    for (name, column) in &map {
        match column {
            Json::Object(cells) => {
                for key in cells.keys() {
                    if !index.contains(key) {
                        index.push(key.clone());
                    }
                }
            }
            Json::Array(cells) => {
                for i in index.len()..cells.len() {
                    index.push(i.to_string());
                }
            }
            _ => {
                return Err(FrameError::Malformed(format!(
                    "column '{name}' holds a scalar; cannot build a frame without an index"
                )))
            }
        }
    }

    let names = map.keys().cloned().collect();
    let cells = map
        .into_iter()
        .map(|(_, column)| {
            index
                .iter()
                .enumerate()
                .map(|(pos, label)| {
                    let cell = match &column {
                        Json::Object(cells) => cells.get(label),
                        Json::Array(cells) => cells.get(pos),
                        _ => None,
                    };
                    cell.cloned().unwrap_or(Json::Null)
                })
                .collect()
        })
        .collect();
    Ok((names, cells))
}

/// One column from its JSON cells. Columns mixing incompatible kinds are kept as text.
fn build_column(name: &str, values: Vec<Json>) -> PolarsResult<Column> {
    let any_values: Vec<AnyValue<'static>> = values.iter().map(json_to_any).collect();
    let series = match Series::from_any_values(name.into(), &any_values, false) {
        Ok(series) => series,
        Err(_) => {
            let text: Vec<Option<String>> = values
                .iter()
                .map(|v| match v {
                    Json::Null => None,
                    Json::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Series::new(name.into(), text)
        }
    };
    Ok(series.into())
}

fn json_to_any(v: &Json) -> AnyValue<'static> {
    match v {
        Json::Null => AnyValue::Null,
        Json::Bool(b) => AnyValue::Boolean(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => AnyValue::Int64(i),
            None => n.as_f64().map(AnyValue::Float64).unwrap_or(AnyValue::Null),
        },
        Json::String(s) => AnyValue::StringOwned(s.as_str().into()),
        nested => AnyValue::StringOwned(nested.to_string().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{column_names, f64_values, text_values};

    #[test]
    fn records_keep_first_seen_column_order() {
        let df = read_json_str(
            r#"[{"Name": "a", "Age": 22}, {"Name": "b", "Age": null, "Fare": 7.25}]"#,
        )
        .unwrap();
        assert_eq!(column_names(&df), vec!["Name", "Age", "Fare"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Age").unwrap().dtype(), &DataType::Float64);
        assert_eq!(f64_values(&df, "Fare").unwrap(), vec![None, Some(7.25)]);
    }

    #[test]
    fn columns_orientation() {
        let df = read_json_str(r#"{"Pclass": {"0": 1, "1": 3}, "Sex": {"0": "male", "1": "female"}}"#)
            .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Pclass").unwrap().dtype(), &DataType::Int64);
        assert_eq!(text_values(&df, "Sex").unwrap(), vec!["male", "female"]);
    }

    #[test]
    fn list_columns() {
        let df = read_json_str(r#"{"a": [1, 2, 3], "b": ["x", "y"]}"#).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(text_values(&df, "b").unwrap(), vec!["x", "y", ""]);
    }

    #[test]
    fn scalar_array_is_a_single_column() {
        let df = read_json_str("[1, 2, 3]").unwrap();
        assert_eq!(column_names(&df), vec!["0"]);
        assert_eq!(f64_values(&df, "0").unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn positional_rows_get_numbered_columns() {
        let df = read_json_str(r#"[[1, "a"], [2, "b"]]"#).unwrap();
        assert_eq!(column_names(&df), vec!["0", "1"]);
        assert_eq!(text_values(&df, "1").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn mixed_kinds_fall_back_to_text() {
        let df = read_json_str(r#"[{"v": true}, {"v": "x"}, {"v": null}]"#).unwrap();
        assert_eq!(df.column("v").unwrap().null_count(), 1);
        assert_eq!(text_values(&df, "v").unwrap()[1], "x");
    }

    #[test]
    fn scalar_columns_are_rejected() {
        assert!(read_json_str(r#"{"a": 1}"#).is_err());
        assert!(read_json_str("42").is_err());
        assert!(read_json_str("{not json").is_err());
    }

    #[test]
    fn empty_array_is_an_empty_frame() {
        let df = read_json_str("[]").unwrap();
        assert_eq!(df.height(), 0);
    }
}
