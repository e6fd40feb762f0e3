use crate::constants::{AGE, EMBARKED, PORTS, SEX};
use crate::frame::has_column;
use polars::prelude::*;
use tracing::debug;

pub fn apply(df: DataFrame) -> PolarsResult<DataFrame> {
    let mut exprs = Vec::new();

    if matches!(df.column(SEX).map(|c| c.dtype()), Ok(DataType::String)) {
        exprs.push(col(SEX).str().to_lowercase());
    }

    if let Some(ages) = df.column(AGE).ok().filter(|ages| ages.null_count() > 0) {
        // No median when every age is missing; the column is left as is
        if let Some(median_age) = ages.as_materialized_series().median() {
            debug!(median_age, "Filling missing ages");
            exprs.push(col(AGE).fill_null(lit(median_age)));
        }
    }

    if has_column(&df, EMBARKED) {
        exprs.push(port_names());
    }

    if exprs.is_empty() {
        return Ok(df);
    }
    df.lazy().with_columns(exprs).collect()
}

/// Port codes expanded to names. Unknown codes (and already expanded names) become missing.
fn port_names() -> Expr {
    let code = col(EMBARKED).cast(DataType::String);
    PORTS
        .iter()
        .rev()
        .fold(lit(NULL).cast(DataType::String), |otherwise, (c, name)| {
            when(code.clone().eq(lit(*c)))
                .then(lit(*name))
                .otherwise(otherwise)
        })
        .alias(EMBARKED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{f64_values, read_csv_str, text_values};

    #[test]
    fn normalizes_sex_age_and_port() {
        let df = read_csv_str("Sex,Age,Embarked\nMALE,22,S\nFemale,,C\nmale,40,Q\nfemale,30,X\n,35,\n")
            .unwrap();
        let out = apply(df).unwrap();

        assert_eq!(
            text_values(&out, SEX).unwrap(),
            vec!["male", "female", "male", "female", ""]
        );
        assert_eq!(out.column(SEX).unwrap().null_count(), 1);

        // median of 22, 40, 30, 35
        assert_eq!(
            f64_values(&out, AGE).unwrap(),
            vec![Some(22.0), Some(32.5), Some(40.0), Some(30.0), Some(35.0)]
        );

        assert_eq!(
            text_values(&out, EMBARKED).unwrap(),
            vec!["Southampton", "Cherbourg", "Queenstown", "", ""]
        );
        assert_eq!(out.column(EMBARKED).unwrap().null_count(), 2);
    }

    #[test]
    fn expanded_names_do_not_survive_a_second_pass() {
        let df = read_csv_str("Embarked\nSouthampton\nQ\n").unwrap();
        let out = apply(df).unwrap();
        assert_eq!(text_values(&out, EMBARKED).unwrap(), vec!["", "Queenstown"]);
    }

    #[test]
    fn all_missing_ages_stay_missing() {
        let df = read_csv_str("Name,Age\nA,\nB,\n").unwrap();
        let out = apply(df).unwrap();
        assert_eq!(f64_values(&out, AGE).unwrap(), vec![None, None]);
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn absent_columns_are_skipped() {
        let df = read_csv_str("Name\nA\n").unwrap();
        assert!(apply(df.clone()).unwrap().equals(&df));
    }
}
