//! Value-level treatments that keep every row.

use super::bounds::{compute_bounds, OutlierMethod};
use super::{fold_columns, validate_threshold};
use crate::data::{Column, Table};
use crate::error::{EdaError, Result};
use crate::stats::zscore::{is_degenerate, zscores};
use crate::stats::{median, winsorize};
use tracing::{debug, warn};

/// Clamp values to bounds computed per column.
///
/// Values below the lower bound become the lower bound, values above the
/// upper bound become the upper bound. Missing values stay missing.
///
/// # Arguments
/// * `table` - The table to treat
/// * `columns` - Numeric columns to clip
/// * `method` - How to compute the bounds
/// * `lower_percentile` - Lower rank for [`OutlierMethod::Percentile`]
/// * `upper_percentile` - Upper rank for [`OutlierMethod::Percentile`]
pub fn clip_outliers<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    method: OutlierMethod,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Table> {
    fold_columns(table, columns, |t, c| {
        clip_column(t, c, method, lower_percentile, upper_percentile)
    })
}

/// Replace each value `x` with `ln(1 + x)`.
///
/// Fails with [`EdaError::Numerical`] if a column holds a value `<= -1`; the
/// column is checked before it is changed.
pub fn log_transform<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Table> {
    fold_columns(table, columns, log_column)
}

/// Winsorize each column with `limits = (lower, upper)` tail fractions.
///
/// See [`crate::stats::winsorize`] for the ranking rule.
pub fn winsorize_outliers<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    limits: (f64, f64),
) -> Result<Table> {
    fold_columns(table, columns, |t, c| winsorize_column(t, c, limits))
}

/// Replace values with `|z| >= threshold` by the column median.
///
/// Scores are computed over non-missing values and matched back to their
/// own rows. Missing values stay missing; a zero-variance column is left as is.
pub fn clip_outliers_zscore<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    threshold: f64,
) -> Result<Table> {
    fold_columns(table, columns, |t, c| clip_zscore_column(t, c, threshold))
}

pub(crate) fn clip_column(
    table: &Table,
    column: &str,
    method: OutlierMethod,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Table> {
    let values = table.numeric(column)?;
    let bounds = compute_bounds(column, values, method, lower_percentile, upper_percentile)?;
    let clipped: Vec<Option<f64>> = values.iter().map(|v| v.map(|x| bounds.clamp(x))).collect();
    debug!(column, %method, lower = bounds.lower, upper = bounds.upper, "clipped column");
    replace_values(table, column, clipped)
}

pub(crate) fn log_column(table: &Table, column: &str) -> Result<Table> {
    let values = table.numeric(column)?;
    if let Some(bad) = values.iter().flatten().find(|&&x| x <= -1.0) {
        return Err(EdaError::Numerical(format!(
            "log transform of column '{}' requires values > -1; found {}",
            column, bad
        )));
    }
    let transformed: Vec<Option<f64>> = values.iter().map(|v| v.map(f64::ln_1p)).collect();
    debug!(column, "applied log1p transform");
    replace_values(table, column, transformed)
}

pub(crate) fn winsorize_column(table: &Table, column: &str, limits: (f64, f64)) -> Result<Table> {
    let values = table.numeric(column)?;
    let winsorized = winsorize(values, limits.0, limits.1)?;
    debug!(column, lower = limits.0, upper = limits.1, "winsorized column");
    replace_values(table, column, winsorized)
}

pub(crate) fn clip_zscore_column(table: &Table, column: &str, threshold: f64) -> Result<Table> {
    validate_threshold(threshold)?;
    let values = table.numeric(column)?;
    let center = match median(values) {
        Some(m) => m,
        None => return Ok(table.clone()),
    };
    if is_degenerate(values) {
        warn!(column, "zero variance, z-scores undefined; no values replaced");
    }

    let mut replaced = 0usize;
    let treated: Vec<Option<f64>> = values
        .iter()
        .zip(zscores(values))
        .map(|(v, z)| match z {
            Some(z) if z.abs() >= threshold => {
                replaced += 1;
                Some(center)
            }
            _ => *v,
        })
        .collect();
    debug!(column, threshold, median = center, replaced, "replaced z-score outliers");
    replace_values(table, column, treated)
}

fn replace_values(table: &Table, column: &str, values: Vec<Option<f64>>) -> Result<Table> {
    let mut next = table.clone();
    next.set_column(column, Column::Numeric(values))?;
    Ok(next)
}
