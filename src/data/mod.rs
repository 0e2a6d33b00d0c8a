//! Data structures shared by the outlier and contingency engines.

mod frame;
mod table;

pub use frame::LabeledFrame;
pub use table::{Column, ColumnType, Table};
