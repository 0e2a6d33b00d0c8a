//! String-labeled table of floating point columns.
//!
//! Contingency counts and the probability views derived from them are
//! indexed by category label rather than by row position, so they use this
//! frame instead of [`Table`](super::Table).

use crate::error::{EdaError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A table with string row labels and named `Option<f64>` columns.
///
/// `None` is the missing marker (rendered as `NaN`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledFrame {
    row_labels: Vec<String>,
    column_names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl LabeledFrame {
    /// Create a frame with the given row labels and no columns.
    pub fn new(row_labels: Vec<String>) -> Self {
        Self {
            row_labels,
            column_names: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Row labels in order.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    pub fn has_row(&self, label: &str) -> bool {
        self.row_labels.iter().any(|r| r == label)
    }

    /// Append a column. Values are parallel to the row labels.
    pub fn push_column<S: Into<String>>(&mut self, name: S, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(EdaError::DuplicateColumn(name));
        }
        if values.len() != self.n_rows() {
            return Err(EdaError::DimensionMismatch {
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        self.column_names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Append a row. Values are parallel to the column names.
    pub fn push_row<S: Into<String>>(&mut self, label: S, values: Vec<Option<f64>>) -> Result<()> {
        let label = label.into();
        if self.has_row(&label) {
            return Err(EdaError::InvalidParameter(format!(
                "Row label '{}' already exists",
                label
            )));
        }
        if values.len() != self.n_columns() {
            return Err(EdaError::DimensionMismatch {
                expected: self.n_columns(),
                actual: values.len(),
            });
        }
        self.row_labels.push(label);
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
        Ok(())
    }

    /// Values of a column.
    pub fn column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column_names
            .iter()
            .position(|c| c == name)
            .map(|pos| self.columns[pos].as_slice())
            .ok_or_else(|| EdaError::MissingColumn(name.to_string()))
    }

    /// Value at `(row, column)`. `Ok(None)` means the cell is missing.
    pub fn value(&self, row: &str, column: &str) -> Result<Option<f64>> {
        let values = self.column(column)?;
        let pos = self
            .row_labels
            .iter()
            .position(|r| r == row)
            .ok_or_else(|| EdaError::InvalidParameter(format!("Unknown row label '{}'", row)))?;
        Ok(values[pos])
    }

    /// Left join on row label.
    ///
    /// Every row of `self` is kept in order; `other`'s columns are appended,
    /// with `None` where `other` has no row of that label.
    pub fn merge_left(&self, other: &LabeledFrame) -> Result<LabeledFrame> {
        let lookup: HashMap<&str, usize> = other
            .row_labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();
        let positions: Vec<Option<usize>> = self
            .row_labels
            .iter()
            .map(|label| lookup.get(label.as_str()).copied())
            .collect();

        let mut merged = self.clone();
        for (name, values) in other.column_names.iter().zip(&other.columns) {
            let aligned = positions
                .iter()
                .map(|pos| pos.and_then(|p| values[p]))
                .collect();
            merged.push_column(name.clone(), aligned)?;
        }
        Ok(merged)
    }

    /// Copy of this frame without the columns that also appear in `other`.
    pub fn without_columns_of(&self, other: &LabeledFrame) -> LabeledFrame {
        let mut kept = LabeledFrame::new(self.row_labels.clone());
        for (name, values) in self.column_names.iter().zip(&self.columns) {
            if !other.has_column(name) {
                kept.column_names.push(name.clone());
                kept.columns.push(values.clone());
            }
        }
        kept
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(EdaError::from)
    }
}

impl fmt::Display for LabeledFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .map(|v| match v {
                        Some(x) if x.fract() == 0.0 => format!("{}", x),
                        Some(x) => format!("{:.2}", x),
                        None => "NaN".to_string(),
                    })
                    .collect()
            })
            .collect();

        let label_width = self.row_labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .column_names
            .iter()
            .zip(&cells)
            .map(|(name, col)| col.iter().map(|c| c.len()).chain([name.len()]).max().unwrap_or(0))
            .collect();

        write!(f, "{:label_width$}", "")?;
        for (name, width) in self.column_names.iter().zip(&widths) {
            write!(f, "  {:>width$}", name, width = width)?;
        }
        writeln!(f)?;
        for (row, label) in self.row_labels.iter().enumerate() {
            write!(f, "{:label_width$}", label)?;
            for (col, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", col[row], width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
