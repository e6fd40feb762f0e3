use crate::frame::{format_cell, format_float, is_numeric, pandas_dtype};
use polars::prelude::*;
use std::fmt;

/// Per-column dtype and completeness
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: &'static str,
}

/// Descriptive statistics of one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    fn from_column(column: &Column) -> PolarsResult<Self> {
        let floats = column.cast(&DataType::Float64)?;
        let values = floats.f64()?;
        let quantile = |q: f64| values.quantile(q, QuantileMethod::Linear);
        Ok(Self {
            name: column.name().to_string(),
            count: values.len() - values.null_count(),
            mean: values.mean(),
            std: values.std(1),
            min: values.min(),
            q25: quantile(0.25)?,
            q50: quantile(0.5)?,
            q75: quantile(0.75)?,
            max: values.max(),
        })
    }
}

/// Overview printed before the charts are drawn
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub rows: usize,
    pub info: Vec<ColumnInfo>,
    pub describe: Vec<ColumnStats>,
    pub head: DataFrame,
}

impl DatasetSummary {
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Self> {
        let info = df
            .get_columns()
            .iter()
            .map(|column| ColumnInfo {
                name: column.name().to_string(),
                non_null: column.len() - column.null_count(),
                dtype: pandas_dtype(column.dtype()),
            })
            .collect();

        let describe = df
            .get_columns()
            .iter()
            .filter(|column| is_numeric(column.dtype()))
            .map(ColumnStats::from_column)
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self {
            rows: df.height(),
            info,
            describe,
            head: df.head(Some(5)),
        })
    }
}

fn stat(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.6}"),
        None => "NaN".to_string(),
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n📋 Dataset Overview:")?;
        writeln!(f, "RangeIndex: {} entries, 0 to {}", self.rows, self.rows.saturating_sub(1))?;
        writeln!(f, "Data columns (total {} columns):", self.info.len())?;
        writeln!(f, " #   {:<16} {:<16} {}", "Column", "Non-Null Count", "Dtype")?;
        for (i, info) in self.info.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<16} {:<16} {}",
                i,
                info.name,
                format!("{} non-null", info.non_null),
                info.dtype
            )?;
        }

        writeln!(f, "\n📊 Descriptive Statistics:")?;
        if self.describe.is_empty() {
            writeln!(f, "(no numeric columns)")?;
        } else {
            write!(f, "{:<8}", "")?;
            for s in &self.describe {
                write!(f, "{:>16}", s.name)?;
            }
            writeln!(f)?;
            let rows: [(&str, fn(&ColumnStats) -> String); 8] = [
                ("count", |s| format!("{:.6}", s.count as f64)),
                ("mean", |s| stat(s.mean)),
                ("std", |s| stat(s.std)),
                ("min", |s| stat(s.min)),
                ("25%", |s| stat(s.q25)),
                ("50%", |s| stat(s.q50)),
                ("75%", |s| stat(s.q75)),
                ("max", |s| stat(s.max)),
            ];
            for (label, get) in rows {
                write!(f, "{label:<8}")?;
                for s in &self.describe {
                    write!(f, "{:>16}", get(s))?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f, "\n🧪 Sample Data:")?;
        write_table(f, &self.head)
    }
}

/// Right-aligned text rendering with a leading row number column. Missing
/// cells show as `NaN`, as pandas prints them.
fn write_table(f: &mut fmt::Formatter<'_>, df: &DataFrame) -> fmt::Result {
    let columns = df.get_columns();
    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|column| match column.get(row) {
                    Ok(AnyValue::Null) => "NaN".to_string(),
                    Ok(value) => format_cell(&value),
                    Err(_) => String::new(),
                })
                .collect()
        })
        .collect();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let index_width = df.height().saturating_sub(1).to_string().len();

    write!(f, "{:width$}", "", width = index_width)?;
    for (name, w) in names.iter().zip(&widths) {
        write!(f, "  {:>w$}", name, w = *w)?;
    }
    writeln!(f)?;
    for (i, row) in cells.iter().enumerate() {
        write!(f, "{:<width$}", i, width = index_width)?;
        for (cell, w) in row.iter().zip(&widths) {
            write!(f, "  {:>w$}", cell, w = *w)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// `df.describe()`-style one-liner used in log lines
pub fn one_line(stats: &ColumnStats) -> String {
    format!(
        "{}: count={} mean={} min={} max={}",
        stats.name,
        stats.count,
        stats.mean.map(format_float).unwrap_or_default(),
        stats.min.map(format_float).unwrap_or_default(),
        stats.max.map(format_float).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::read_csv_str;

    fn summary() -> DatasetSummary {
        let df = read_csv_str(
            "Pclass,Embarked,SurvivalRate,Fare\n1,Cherbourg,0.5,80\n2,Southampton,0.25,\n3,Queenstown,0.75,10\n",
        )
        .unwrap();
        DatasetSummary::from_frame(&df).unwrap()
    }

    #[test]
    fn info_reports_counts_and_dtypes() {
        let s = summary();
        assert_eq!(s.rows, 3);
        assert_eq!(s.info[1].dtype, "object");
        assert_eq!(s.info[3].non_null, 2);
        assert_eq!(s.info[3].dtype, "float64");
    }

    #[test]
    fn describe_covers_numeric_columns_only() {
        let s = summary();
        let names: Vec<&str> = s.describe.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pclass", "SurvivalRate", "Fare"]);
        let rate = &s.describe[1];
        assert_eq!(rate.mean, Some(0.5));
        assert_eq!(rate.q50, Some(0.5));
        assert_eq!(rate.min, Some(0.25));
        assert_eq!(s.describe[2].count, 2);
    }

    #[test]
    fn renders_all_sections() {
        let text = summary().to_string();
        assert!(text.contains("Dataset Overview"));
        assert!(text.contains("Descriptive Statistics"));
        assert!(text.contains("Sample Data"));
        assert!(text.contains("Queenstown"));
        // the missing fare of the second row
        assert!(text.contains("NaN"));
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let df = read_csv_str("v\n1\n2\n3\n4\n5\n").unwrap();
        let s = DatasetSummary::from_frame(&df).unwrap();
        let v = &s.describe[0];
        assert_eq!(v.q25, Some(2.0));
        assert_eq!(v.q50, Some(3.0));
        assert!((v.std.unwrap() - 1.5811388300841898).abs() < 1e-12);
        assert_eq!(s.info[0].dtype, "int64");
    }

    #[test]
    fn one_line_summary() {
        let s = summary();
        assert_eq!(
            one_line(&s.describe[2]),
            "Fare: count=2 mean=45.0 min=10.0 max=80.0"
        );
    }
}
