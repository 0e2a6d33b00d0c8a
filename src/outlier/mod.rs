//! Outlier detection and treatment for numeric columns.
//!
//! Every treatment is available as a free function returning a new
//! [`Table`], and through [`OutlierHandler`], which keeps the latest table as
//! its state so treatments can be chained.

pub mod bounds;
pub mod flag;
pub mod handler;
pub mod plan;
pub mod remove;
pub mod treat;

pub use bounds::{
    compute_bounds, iqr_bounds, percentile_bounds, Bounds, OutlierMethod,
    DEFAULT_LOWER_PERCENTILE, DEFAULT_UPPER_PERCENTILE, IQR_MULTIPLIER,
};
pub use flag::flag_outliers;
pub use handler::OutlierHandler;
pub use plan::{TreatmentPlan, TreatmentStep};
pub use remove::{remove_outliers_iqr, remove_outliers_percentile, remove_outliers_zscore};
pub use treat::{clip_outliers, clip_outliers_zscore, log_transform, winsorize_outliers};

use crate::data::Table;
use crate::error::{EdaError, Result};

/// Default z-score threshold.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Default winsorization limits (lower, upper).
pub const DEFAULT_WINSOR_LIMITS: (f64, f64) = (0.05, 0.05);

/// Apply a single-column step to each column in turn.
fn fold_columns<S, F>(table: &Table, columns: &[S], mut step: F) -> Result<Table>
where
    S: AsRef<str>,
    F: FnMut(&Table, &str) -> Result<Table>,
{
    let mut current = table.clone();
    for column in columns {
        current = step(&current, column.as_ref())?;
    }
    Ok(current)
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(EdaError::InvalidParameter(
            "Z-score threshold must be positive and finite".to_string(),
        ));
    }
    Ok(())
}
