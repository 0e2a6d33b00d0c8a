//! Per-column outlier bounds.

use crate::error::{EdaError, Result};
use crate::stats::{present_sorted, quantile_sorted};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multiplier applied to the IQR to place the fences.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Default lower percentile rank for the percentile method.
pub const DEFAULT_LOWER_PERCENTILE: f64 = 0.05;

/// Default upper percentile rank for the percentile method.
pub const DEFAULT_UPPER_PERCENTILE: f64 = 0.95;

/// How bounds are derived from a column's distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Tukey fences: `Q1 - 1.5 * IQR` and `Q3 + 1.5 * IQR`.
    Iqr,
    /// Values at caller-supplied percentile ranks.
    Percentile,
}

impl FromStr for OutlierMethod {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            "percentile" => Ok(OutlierMethod::Percentile),
            _ => Err(EdaError::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMethod::Iqr => write!(f, "iqr"),
            OutlierMethod::Percentile => write!(f, "percentile"),
        }
    }
}

/// Inclusive `[lower, upper]` range of accepted values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// True if `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Clamp `value` into the bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }
}

/// Check that percentile ranks satisfy `0 <= lower <= upper <= 1`.
pub fn validate_percentiles(lower: f64, upper: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) {
        return Err(EdaError::InvalidParameter(
            "Percentiles must be between 0 and 1".to_string(),
        ));
    }
    if upper < lower {
        return Err(EdaError::InvalidParameter(
            "upper_percentile cannot be less than lower_percentile".to_string(),
        ));
    }
    Ok(())
}

/// IQR fences of a column's non-missing values.
pub fn iqr_bounds(column: &str, values: &[Option<f64>]) -> Result<Bounds> {
    let sorted = non_empty_sorted(column, values)?;
    let (q1, q3) = match (quantile_sorted(&sorted, 0.25), quantile_sorted(&sorted, 0.75)) {
        (Some(q1), Some(q3)) => (q1, q3),
        _ => return Err(empty_column(column)),
    };
    let iqr = q3 - q1;
    Ok(Bounds {
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    })
}

/// Percentile bounds of a column's non-missing values.
pub fn percentile_bounds(
    column: &str,
    values: &[Option<f64>],
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Bounds> {
    validate_percentiles(lower_percentile, upper_percentile)?;
    let sorted = non_empty_sorted(column, values)?;
    match (
        quantile_sorted(&sorted, lower_percentile),
        quantile_sorted(&sorted, upper_percentile),
    ) {
        (Some(lower), Some(upper)) => Ok(Bounds { lower, upper }),
        _ => Err(empty_column(column)),
    }
}

/// Compute bounds with the chosen method.
///
/// The percentile ranks are ignored by [`OutlierMethod::Iqr`] but are still
/// validated, so a bad configuration fails regardless of method.
pub fn compute_bounds(
    column: &str,
    values: &[Option<f64>],
    method: OutlierMethod,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<Bounds> {
    validate_percentiles(lower_percentile, upper_percentile)?;
    match method {
        OutlierMethod::Iqr => iqr_bounds(column, values),
        OutlierMethod::Percentile => {
            percentile_bounds(column, values, lower_percentile, upper_percentile)
        }
    }
}

fn non_empty_sorted(column: &str, values: &[Option<f64>]) -> Result<Vec<f64>> {
    let sorted = present_sorted(values);
    if sorted.is_empty() {
        return Err(empty_column(column));
    }
    Ok(sorted)
}

fn empty_column(column: &str) -> EdaError {
    EdaError::EmptyData(format!("Column '{}' has no non-missing values", column))
}
