//! Composable Exploratory Data Analysis (EDA) Library
//!
//! This library provides outlier treatment and cross-tabulation primitives
//! over an in-memory table of typed columns.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (Table, Column, LabeledFrame)
//! - **stats**: Quantiles, z-scores and winsorization
//! - **outlier**: Outlier removal, clipping, transformation and flagging
//! - **crosstab**: Contingency tables with marginal, conditional and joint probabilities
//! - **profile**: Table profiling (missingness, summaries, level counts)
//! - **naming**: Names of derived columns and rows
//!
//! # Example
//!
//! ```
//! use composable_eda::prelude::*;
//!
//! let table = Table::from_columns(vec![
//!     ("price", Column::numeric([10.0, 12.0, 11.0, 13.0, 250.0])),
//!     ("region", Column::categorical(["north", "south", "north", "south", "north"])),
//! ])
//! .unwrap();
//!
//! // Chain treatments; the handler keeps the latest table
//! let mut handler = OutlierHandler::new(table);
//! handler
//!     .flag_outliers(&["price"], OutlierMethod::Iqr, 0.05, 0.95)
//!     .unwrap();
//! handler.remove_outliers_iqr(&["price"]).unwrap();
//! assert_eq!(handler.table().n_rows(), 4);
//!
//! // Cross-tabulate two categorical columns
//! let sales = Table::from_columns(vec![
//!     ("Gender", Column::categorical(["M", "M", "F", "F"])),
//!     ("Product", Column::categorical(["B", "A", "A", "A"])),
//! ])
//! .unwrap();
//! let analysis = CrossTabAnalysis::new(&sales, "Gender", "Product").unwrap();
//! let joint = analysis.joint_probabilities().unwrap();
//! assert_eq!(joint.value("M", "joint_prob_B_Gender").unwrap(), Some(25.0));
//! ```

pub mod crosstab;
pub mod data;
pub mod error;
pub mod naming;
pub mod outlier;
pub mod profile;
pub mod stats;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::crosstab::{ContingencyTable, CrossTabAnalysis};
    pub use crate::data::{Column, ColumnType, LabeledFrame, Table};
    pub use crate::error::{EdaError, Result};
    pub use crate::naming::{NameRegistry, MARGIN_LABEL};
    pub use crate::outlier::{
        clip_outliers, clip_outliers_zscore, compute_bounds, flag_outliers, log_transform,
        remove_outliers_iqr, remove_outliers_percentile, remove_outliers_zscore,
        winsorize_outliers, Bounds, OutlierHandler, OutlierMethod, TreatmentPlan, TreatmentStep,
        DEFAULT_WINSOR_LIMITS, DEFAULT_Z_THRESHOLD,
    };
    pub use crate::profile::{
        category_counts, profile_table, ColumnProfile, ColumnSummary, NumericSummary,
        TableProfile,
    };
    pub use crate::stats::{median, quantile, winsorize, zscores};
}
