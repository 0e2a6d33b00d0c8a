//! Descriptive profiling of tables.

mod categories;
mod describe;

pub use categories::category_counts;
pub use describe::{profile_table, ColumnProfile, ColumnSummary, NumericSummary, TableProfile};
