use crate::constants::{EMBARKED, FARE, PCLASS, SURVIVAL_RATE, SURVIVED};
use crate::frame::has_column;
use polars::prelude::*;
use tracing::warn;

/// Collapses passengers into survival rate per (class, port), joined with the
/// average fare per port. Frames without the grouping columns pass through.
pub fn apply(df: DataFrame) -> PolarsResult<DataFrame> {
    if ![PCLASS, EMBARKED, SURVIVED].iter().all(|c| has_column(&df, c)) {
        warn!("Skipping transformed layer due to missing columns");
        println!("Warning: Skipping transformed layer due to missing columns");
        return Ok(df);
    }

    let with_fare = has_column(&df, FARE);
    let passengers = df.lazy();

    // Rows with a missing class or port belong to no group
    let survival = passengers
        .clone()
        .filter(col(PCLASS).is_not_null().and(col(EMBARKED).is_not_null()))
        .group_by([col(PCLASS), col(EMBARKED)])
        .agg([col(SURVIVED).cast(DataType::Float64).mean().alias(SURVIVAL_RATE)]);

    let grouped = if with_fare {
        let fares = passengers
            .filter(col(EMBARKED).is_not_null())
            .group_by([col(EMBARKED)])
            .agg([col(FARE).cast(DataType::Float64).mean()]);
        survival.join(
            fares,
            [col(EMBARKED)],
            [col(EMBARKED)],
            JoinArgs::new(JoinType::Left),
        )
    } else {
        survival
    };

    grouped
        .sort([PCLASS, EMBARKED], SortMultipleOptions::default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{column_names, f64_values, read_csv_str, text_values};

    const ENRICHED: &str = "\
Survived,Pclass,Embarked,Fare
0,3,Southampton,7.25
1,1,Cherbourg,71.2833
1,3,Southampton,7.925
1,1,Southampton,53.1
0,3,Queenstown,8.4583
0,1,,80.0
1,3,Southampton,
";

    #[test]
    fn survival_rate_per_class_and_port_with_port_fare() {
        let out = apply(read_csv_str(ENRICHED).unwrap()).unwrap();
        assert_eq!(column_names(&out), vec!["Pclass", "Embarked", "SurvivalRate", "Fare"]);

        assert_eq!(text_values(&out, PCLASS).unwrap(), vec!["1", "1", "3", "3"]);
        assert_eq!(
            text_values(&out, EMBARKED).unwrap(),
            vec!["Cherbourg", "Southampton", "Queenstown", "Southampton"]
        );

        let rates = f64_values(&out, SURVIVAL_RATE).unwrap();
        assert_eq!(rates[0], Some(1.0));
        // 3 rows in (3, Southampton), 2 survived
        assert_eq!(rates[3], Some(2.0 / 3.0));

        let fares = f64_values(&out, FARE).unwrap();
        assert_eq!(fares[0], Some(71.2833));
        // Southampton fare averages the three known fares across classes
        let expected = (7.25 + 7.925 + 53.1) / 3.0;
        assert!((fares[1].unwrap() - expected).abs() < 1e-12);
        assert!((fares[3].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn group_without_any_survival_value_has_no_rate() {
        let df = read_csv_str(
            "Survived,Pclass,Embarked,Fare\n,2,Cherbourg,30.0\n,2,Cherbourg,10.0\n1,3,Cherbourg,8.0\n",
        )
        .unwrap();
        let out = apply(df).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(f64_values(&out, SURVIVAL_RATE).unwrap(), vec![None, Some(1.0)]);
        assert_eq!(f64_values(&out, FARE).unwrap(), vec![Some(16.0), Some(16.0)]);
    }

    #[test]
    fn fare_column_is_optional() {
        let out = apply(read_csv_str("Survived,Pclass,Embarked\n1,2,Cherbourg\n").unwrap()).unwrap();
        assert_eq!(column_names(&out), vec!["Pclass", "Embarked", "SurvivalRate"]);
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn passes_through_without_grouping_columns() {
        let input = read_csv_str("Survived,Pclass\n1,2\n").unwrap();
        assert!(apply(input.clone()).unwrap().equals(&input));
    }
}
