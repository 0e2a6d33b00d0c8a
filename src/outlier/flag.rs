//! Boolean outlier flags.

use super::bounds::{compute_bounds, OutlierMethod};
use super::fold_columns;
use crate::data::{Column, ColumnType, Table};
use crate::error::{EdaError, Result};
use crate::naming::outlier_flag_name;
use tracing::debug;

/// Add a `<column>_outlier_flag` boolean column for each column.
///
/// A flag is `true` when the value is not within the computed bounds,
/// including when the value is missing. The original column and the row count
/// are left untouched. Flagging the same column again overwrites the previous
/// flag; a non-boolean column already using the flag name is an error.
pub fn flag_outliers<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    method: OutlierMethod,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Table> {
    fold_columns(table, columns, |t, c| {
        flag_column(t, c, method, lower_percentile, upper_percentile)
    })
}

pub(crate) fn flag_column(
    table: &Table,
    column: &str,
    method: OutlierMethod,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Table> {
    let values = table.numeric(column)?;
    let flag_name = outlier_flag_name(column);
    if let Ok(existing) = table.column(&flag_name) {
        if existing.column_type() != ColumnType::Boolean {
            return Err(EdaError::DuplicateColumn(flag_name));
        }
    }

    let bounds = compute_bounds(column, values, method, lower_percentile, upper_percentile)?;
    let flags: Vec<bool> = values
        .iter()
        .map(|v| !v.is_some_and(|x| bounds.contains(x)))
        .collect();
    let n_flagged = flags.iter().filter(|&&f| f).count();
    debug!(column, %method, n_flagged, "flagged outliers");

    let mut next = table.clone();
    next.set_column(flag_name, Column::Boolean(flags))?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> Table {
        Table::from_columns(vec![
            ("a", Column::numeric([1.0, 2.0, 3.0, 4.0, 100.0, f64::NAN])),
            ("b", Column::numeric([5.0, 5.0, 6.0, 6.0, 5.5, 5.5])),
        ])
        .unwrap()
    }

    #[test]
    fn test_flag_iqr() {
        let table = create_test_table();
        let flagged = flag_outliers(&table, &["a"], OutlierMethod::Iqr, 0.05, 0.95).unwrap();

        assert_eq!(flagged.n_rows(), 6);
        assert_eq!(
            flagged.boolean("a_outlier_flag").unwrap(),
            &[false, false, false, false, true, true]
        );
        assert_eq!(flagged.numeric("a").unwrap(), table.numeric("a").unwrap());
    }

    #[test]
    fn test_flag_multiple_columns() {
        let table = create_test_table();
        let flagged = flag_outliers(&table, &["a", "b"], OutlierMethod::Iqr, 0.05, 0.95).unwrap();

        assert_eq!(flagged.n_columns(), 4);
        assert!(flagged.boolean("b_outlier_flag").unwrap().iter().all(|f| !f));
    }

    #[test]
    fn test_flag_percentile() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let table = Table::from_columns(vec![("v", Column::numeric(values))]).unwrap();

        let flagged = flag_outliers(&table, &["v"], OutlierMethod::Percentile, 0.1, 0.9).unwrap();
        let flags = flagged.boolean("v_outlier_flag").unwrap();

        assert_eq!(flags.iter().filter(|&&f| f).count(), 20);
    }

    #[test]
    fn test_reflag_overwrites() {
        let table = create_test_table();
        let once = flag_outliers(&table, &["a"], OutlierMethod::Iqr, 0.05, 0.95).unwrap();
        let twice = flag_outliers(&once, &["a"], OutlierMethod::Iqr, 0.05, 0.95).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flag_name_taken_by_data() {
        let table = create_test_table()
            .with_column("a_outlier_flag", Column::numeric([0.0; 6]))
            .unwrap();
        assert!(matches!(
            flag_outliers(&table, &["a"], OutlierMethod::Iqr, 0.05, 0.95),
            Err(EdaError::DuplicateColumn(_))
        ));
    }
}
