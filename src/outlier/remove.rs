//! Row removal by outlier bounds.
//!
//! Columns are processed one after another, and each column's bounds are
//! computed on the table left by the previous column. Column order therefore
//! affects which rows survive.

use super::bounds::{iqr_bounds, percentile_bounds, Bounds};
use super::{fold_columns, validate_threshold};
use crate::data::Table;
use crate::error::Result;
use crate::stats::zscore::{is_degenerate, zscores};
use tracing::{debug, warn};

/// Remove rows outside the IQR fences of each column.
///
/// A row with a missing value in a processed column is removed too, since a
/// missing value does not lie within the bounds.
///
/// # Arguments
/// * `table` - The table to filter
/// * `columns` - Numeric columns, processed in order
///
/// # Returns
/// A new Table containing only the surviving rows, with their original index.
pub fn remove_outliers_iqr<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Table> {
    fold_columns(table, columns, remove_iqr)
}

/// Remove rows outside the given percentile ranks of each column.
///
/// # Arguments
/// * `table` - The table to filter
/// * `columns` - Numeric columns, processed in order
/// * `lower_percentile` - Lower rank (0.0 to 1.0, default 0.05)
/// * `upper_percentile` - Upper rank (0.0 to 1.0, default 0.95)
pub fn remove_outliers_percentile<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Table> {
    fold_columns(table, columns, |t, c| {
        remove_percentile(t, c, lower_percentile, upper_percentile)
    })
}

/// Remove rows whose z-score reaches `threshold`.
///
/// The comparison is one-sided: a row is kept when `z < threshold`, so large
/// negative scores are never removed. Rows with a missing value are kept, and
/// a zero-variance column removes nothing.
pub fn remove_outliers_zscore<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    threshold: f64,
) -> Result<Table> {
    fold_columns(table, columns, |t, c| remove_zscore(t, c, threshold))
}

pub(crate) fn remove_iqr(table: &Table, column: &str) -> Result<Table> {
    let values = table.numeric(column)?;
    let bounds = iqr_bounds(column, values)?;
    retain_within(table, column, bounds)
}

pub(crate) fn remove_percentile(
    table: &Table,
    column: &str,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Table> {
    let values = table.numeric(column)?;
    let bounds = percentile_bounds(column, values, lower_percentile, upper_percentile)?;
    retain_within(table, column, bounds)
}

pub(crate) fn remove_zscore(table: &Table, column: &str, threshold: f64) -> Result<Table> {
    validate_threshold(threshold)?;
    let values = table.numeric(column)?;
    if is_degenerate(values) {
        warn!(column, "zero variance, z-scores undefined; no rows removed");
    }

    let keep: Vec<bool> = zscores(values)
        .into_iter()
        .map(|z| !matches!(z, Some(z) if z >= threshold))
        .collect();
    let filtered = table.retain_rows(&keep)?;
    debug!(
        column,
        threshold,
        before = table.n_rows(),
        after = filtered.n_rows(),
        "removed z-score outliers"
    );
    Ok(filtered)
}

fn retain_within(table: &Table, column: &str, bounds: Bounds) -> Result<Table> {
    let keep: Vec<bool> = table
        .numeric(column)?
        .iter()
        .map(|v| v.is_some_and(|x| bounds.contains(x)))
        .collect();
    let filtered = table.retain_rows(&keep)?;
    debug!(
        column,
        lower = bounds.lower,
        upper = bounds.upper,
        before = table.n_rows(),
        after = filtered.n_rows(),
        "removed rows outside bounds"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::error::EdaError;

    fn create_test_table() -> Table {
        Table::from_columns(vec![
            ("a", Column::numeric([1.0, 2.0, 3.0, 4.0, 100.0, 2.5])),
            ("b", Column::numeric([10.0, 11.0, 12.0, -90.0, 13.0, 11.5])),
            ("g", Column::categorical(["x", "y", "x", "y", "x", "y"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_remove_iqr_single_column() {
        let table = create_test_table();
        let filtered = remove_outliers_iqr(&table, &["a"]).unwrap();

        assert_eq!(filtered.index(), &[0, 1, 2, 3, 5]);
        assert_eq!(filtered.categorical("g").unwrap().len(), 5);
    }

    #[test]
    fn test_remove_iqr_sequential() {
        let table = create_test_table();
        let filtered = remove_outliers_iqr(&table, &["a", "b"]).unwrap();

        assert_eq!(filtered.index(), &[0, 1, 2, 5]);
    }

    #[test]
    fn test_remove_iqr_drops_missing() {
        let table = Table::from_columns(vec![(
            "a",
            Column::numeric([1.0, f64::NAN, 2.0, 3.0]),
        )])
        .unwrap();
        let filtered = remove_outliers_iqr(&table, &["a"]).unwrap();
        assert_eq!(filtered.index(), &[0, 2, 3]);
    }

    #[test]
    fn test_remove_percentile() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let table = Table::from_columns(vec![("v", Column::numeric(values))]).unwrap();

        let filtered = remove_outliers_percentile(&table, &["v"], 0.05, 0.95).unwrap();

        // bounds 5.95 and 95.05 keep 6..=95
        assert_eq!(filtered.n_rows(), 90);
        assert_eq!(filtered.index()[0], 5);
    }

    #[test]
    fn test_remove_zscore_one_sided() {
        let mut values = vec![0.0; 20];
        values[3] = 50.0;
        values[7] = -50.0;
        let table = Table::from_columns(vec![("v", Column::numeric(values))]).unwrap();

        let filtered = remove_outliers_zscore(&table, &["v"], 2.0).unwrap();

        // the large positive score goes, the large negative one stays
        assert_eq!(filtered.row_position(3), None);
        assert!(filtered.row_position(7).is_some());
        assert_eq!(filtered.n_rows(), 19);
    }

    #[test]
    fn test_remove_zscore_keeps_missing() {
        let mut values = vec![1.0; 20];
        values[2] = f64::NAN;
        values[5] = 40.0;
        values[9] = f64::NAN;
        let table = Table::from_columns(vec![("v", Column::numeric(values))]).unwrap();

        let filtered = remove_outliers_zscore(&table, &["v"], 3.0).unwrap();

        assert_eq!(filtered.n_rows(), 19);
        assert!(filtered.row_position(2).is_some());
        assert!(filtered.row_position(9).is_some());
        assert_eq!(filtered.row_position(5), None);
    }

    #[test]
    fn test_remove_zscore_zero_variance() {
        let table = Table::from_columns(vec![("v", Column::numeric([4.0; 5]))]).unwrap();
        let filtered = remove_outliers_zscore(&table, &["v"], 3.0).unwrap();
        assert_eq!(filtered.n_rows(), 5);
    }

    #[test]
    fn test_invalid_input() {
        let table = create_test_table();

        assert!(matches!(
            remove_outliers_iqr(&table, &["missing"]),
            Err(EdaError::MissingColumn(_))
        ));
        assert!(matches!(
            remove_outliers_iqr(&table, &["g"]),
            Err(EdaError::InvalidColumnType { .. })
        ));
        assert!(remove_outliers_percentile(&table, &["a"], 0.9, 0.1).is_err());
        assert!(remove_outliers_zscore(&table, &["a"], 0.0).is_err());
    }
}
