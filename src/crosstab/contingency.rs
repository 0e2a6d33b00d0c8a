//! Contingency table of two categorical columns.

use crate::data::{LabeledFrame, Table};
use crate::error::{EdaError, Result};
use crate::naming::{marginal_prob_name, MARGIN_LABEL};
use nalgebra::DMatrix;
use std::collections::HashMap;

/// Cross-tabulated counts of two categorical variables with margins.
///
/// Levels are stored in sorted order. Rows where either variable is missing
/// are not counted, so `total()` is the number of complete pairs.
#[derive(Debug, Clone)]
pub struct ContingencyTable {
    row_variable: String,
    column_variable: String,
    /// Row levels, sorted.
    row_levels: Vec<String>,
    /// Column levels, sorted.
    column_levels: Vec<String>,
    /// Row levels in order of first appearance.
    row_appearance: Vec<String>,
    /// Column levels in order of first appearance.
    column_appearance: Vec<String>,
    /// Counts (row levels × column levels).
    counts: DMatrix<u64>,
}

impl ContingencyTable {
    /// Cross-tabulate `row_variable` against `column_variable`.
    ///
    /// Levels named `All`, or named like the marginal probability row or
    /// column the analysis adds, are rejected.
    pub fn from_table(table: &Table, row_variable: &str, column_variable: &str) -> Result<Self> {
        let rows = table.categorical(row_variable)?;
        let columns = table.categorical(column_variable)?;

        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .zip(columns)
            .filter_map(|(r, c)| match (r, c) {
                (Some(r), Some(c)) => Some((r.as_str(), c.as_str())),
                _ => None,
            })
            .collect();
        if pairs.is_empty() {
            return Err(EdaError::EmptyData(format!(
                "No rows with both '{}' and '{}' present",
                row_variable, column_variable
            )));
        }

        let row_appearance = first_appearance(pairs.iter().map(|(r, _)| *r));
        let column_appearance = first_appearance(pairs.iter().map(|(_, c)| *c));
        for level in row_appearance.iter().chain(&column_appearance) {
            if level == MARGIN_LABEL {
                return Err(EdaError::InvalidParameter(format!(
                    "Level '{}' clashes with the margin label",
                    level
                )));
            }
        }
        // the marginal view adds a row and a column under these labels
        let marginal_row = marginal_prob_name(column_variable);
        let marginal_column = marginal_prob_name(row_variable);
        if let Some(level) = row_appearance.iter().find(|l| **l == marginal_row) {
            return Err(EdaError::InvalidParameter(format!(
                "Row level '{}' clashes with the marginal probability row",
                level
            )));
        }
        if let Some(level) = column_appearance.iter().find(|l| **l == marginal_column) {
            return Err(EdaError::InvalidParameter(format!(
                "Column level '{}' clashes with the marginal probability column",
                level
            )));
        }

        let mut row_levels = row_appearance.clone();
        row_levels.sort();
        let mut column_levels = column_appearance.clone();
        column_levels.sort();

        let row_pos = positions(&row_levels);
        let col_pos = positions(&column_levels);
        let mut counts = DMatrix::<u64>::zeros(row_levels.len(), column_levels.len());
        for (r, c) in &pairs {
            counts[(row_pos[r], col_pos[c])] += 1;
        }

        Ok(Self {
            row_variable: row_variable.to_string(),
            column_variable: column_variable.to_string(),
            row_levels,
            column_levels,
            row_appearance,
            column_appearance,
            counts,
        })
    }

    pub fn row_variable(&self) -> &str {
        &self.row_variable
    }

    pub fn column_variable(&self) -> &str {
        &self.column_variable
    }

    /// Row levels, sorted.
    pub fn row_levels(&self) -> &[String] {
        &self.row_levels
    }

    /// Column levels, sorted.
    pub fn column_levels(&self) -> &[String] {
        &self.column_levels
    }

    /// Row levels in order of first appearance in the source table.
    pub fn row_levels_by_appearance(&self) -> &[String] {
        &self.row_appearance
    }

    /// Column levels in order of first appearance in the source table.
    pub fn column_levels_by_appearance(&self) -> &[String] {
        &self.column_appearance
    }

    /// The count matrix without margins.
    pub fn counts(&self) -> &DMatrix<u64> {
        &self.counts
    }

    /// Count for a cell. Either label may be [`MARGIN_LABEL`] to read a margin.
    pub fn count(&self, row: &str, column: &str) -> Option<u64> {
        match (self.row_index(row)?, self.column_index(column)?) {
            (Some(i), Some(j)) => Some(self.counts[(i, j)]),
            (Some(i), None) => Some(self.row_sum(i)),
            (None, Some(j)) => Some(self.column_sum(j)),
            (None, None) => Some(self.total()),
        }
    }

    /// Marginal count of a row level.
    pub fn row_total(&self, row: &str) -> Option<u64> {
        self.count(row, MARGIN_LABEL)
    }

    /// Marginal count of a column level.
    pub fn column_total(&self, column: &str) -> Option<u64> {
        self.count(MARGIN_LABEL, column)
    }

    /// Number of counted rows.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Render as a frame with the `All` margin row and column.
    pub fn to_frame(&self) -> Result<LabeledFrame> {
        let row_labels: Vec<String> = self
            .row_levels
            .iter()
            .cloned()
            .chain(std::iter::once(MARGIN_LABEL.to_string()))
            .collect();
        let mut frame = LabeledFrame::new(row_labels.clone());

        let column_labels = self
            .column_levels
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(MARGIN_LABEL));
        for column in column_labels {
            let values = row_labels
                .iter()
                .map(|row| self.count(row, column).map(|n| n as f64))
                .collect();
            frame.push_column(column, values)?;
        }
        Ok(frame)
    }

    // Outer None: unknown label. Inner None: the margin.
    fn row_index(&self, label: &str) -> Option<Option<usize>> {
        if label == MARGIN_LABEL {
            return Some(None);
        }
        self.row_levels.iter().position(|l| l == label).map(Some)
    }

    fn column_index(&self, label: &str) -> Option<Option<usize>> {
        if label == MARGIN_LABEL {
            return Some(None);
        }
        self.column_levels.iter().position(|l| l == label).map(Some)
    }

    fn row_sum(&self, i: usize) -> u64 {
        self.counts.row(i).iter().sum()
    }

    fn column_sum(&self, j: usize) -> u64 {
        self.counts.column(j).iter().sum()
    }
}

fn first_appearance<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for label in labels {
        if !seen.iter().any(|s: &String| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}

fn positions(levels: &[String]) -> HashMap<&str, usize> {
    levels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect()
}
