use crate::constants::{CABIN, PROCESSED, TICKET};
use polars::prelude::*;

/// Drops the ticket/cabin columns and fully empty rows, then flags the rows as processed.
pub fn apply(df: DataFrame) -> PolarsResult<DataFrame> {
    let df = df.drop_many([CABIN, TICKET]);
    let mut df = drop_empty_rows(&df)?;
    let flags = Column::new(PROCESSED.into(), vec![true; df.height()]);
    df.with_column(flags)?;
    Ok(df)
}

/// Keeps rows with at least one present value
fn drop_empty_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut keep = BooleanChunked::full("keep".into(), false, df.height());
    for column in df.get_columns() {
        keep = &keep | &column.is_not_null();
    }
    df.filter(&keep)
}
