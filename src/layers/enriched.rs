use crate::constants::{AGE, AGE_BINS, AGE_GROUP, FAMILY_SIZE, IS_ALONE, PARCH, SIBSP};
use crate::frame::has_column;
use polars::prelude::*;

/// Adds the age band and family-size features.
pub fn apply(df: DataFrame) -> PolarsResult<DataFrame> {
    let mut exprs = Vec::new();

    if has_column(&df, AGE) {
        exprs.push(age_group());
    }

    if has_column(&df, SIBSP) && has_column(&df, PARCH) {
        let family = col(SIBSP) + col(PARCH);
        exprs.push(family.clone().alias(FAMILY_SIZE));
        exprs.push(
            family
                .eq(lit(0))
                .fill_null(lit(false))
                .cast(DataType::Int64)
                .alias(IS_ALONE),
        );
    }

    if exprs.is_empty() {
        return Ok(df);
    }
    df.lazy().with_columns(exprs).collect()
}

/// Right-inclusive bins; ages outside (0, 120] get no group.
fn age_group() -> Expr {
    let age = col(AGE).cast(DataType::Float64);
    AGE_BINS
        .iter()
        .rev()
        .fold(lit(NULL).cast(DataType::String), |otherwise, (lo, hi, label)| {
            let in_bin = age.clone().gt(lit(*lo)).and(age.clone().lt_eq(lit(*hi)));
            when(in_bin).then(lit(*label)).otherwise(otherwise)
        })
        .alias(AGE_GROUP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{column_names, read_csv_str, text_values};

    #[test]
    fn age_bins_are_right_inclusive() {
        let df = read_csv_str("Age\n0\n12\n12.5\n60\n61\n120\n121\n").unwrap();
        let out = apply(df).unwrap();
        assert_eq!(
            text_values(&out, AGE_GROUP).unwrap(),
            vec!["", "Child", "Adult", "Adult", "Senior", "Senior", ""]
        );
    }

    #[test]
    fn family_size_and_alone_flag() {
        let df = read_csv_str("SibSp,Parch\n0,0\n1,2\n").unwrap();
        let out = apply(df).unwrap();
        assert_eq!(column_names(&out), vec!["SibSp", "Parch", "FamilySize", "IsAlone"]);
        assert_eq!(text_values(&out, FAMILY_SIZE).unwrap(), vec!["0", "3"]);
        assert_eq!(text_values(&out, IS_ALONE).unwrap(), vec!["1", "0"]);
    }

    #[test]
    fn missing_counts_make_family_size_missing() {
        let df = read_csv_str("SibSp,Parch\n1,\n0,0\n").unwrap();
        let out = apply(df).unwrap();
        // Parch has a gap, so it is a float column and so is the sum
        assert_eq!(text_values(&out, FAMILY_SIZE).unwrap(), vec!["", "0.0"]);
        assert_eq!(text_values(&out, IS_ALONE).unwrap(), vec!["0", "1"]);
    }

    #[test]
    fn needs_both_family_columns() {
        let df = read_csv_str("SibSp\n1\n").unwrap();
        assert_eq!(column_names(&apply(df).unwrap()), vec!["SibSp"]);
    }
}
