//! Column-level statistics used by the outlier engine.

pub mod quantile;
pub mod winsorize;
pub mod zscore;

pub use quantile::{median, present_sorted, quantile, quantile_sorted};
pub use winsorize::winsorize;
pub use zscore::zscores;
