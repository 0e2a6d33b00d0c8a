//! Shape, missingness and per-column summaries of a table.

use super::categories::level_counts;
use crate::data::{Column, ColumnType, Table};
use crate::stats::{present_sorted, quantile_sorted};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Descriptive statistics of the non-missing values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (divisor `n - 1`). NaN for a single value.
    pub std: f64,
    pub min: f64,
    /// 25th percentile.
    pub q25: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarize a column. `None` when every value is missing.
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        let sorted = present_sorted(values);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        Some(Self {
            count: sorted.len(),
            mean: sorted.iter().mean(),
            std: sorted.iter().std_dev(),
            min,
            q25: quantile_sorted(&sorted, 0.25)?,
            median: quantile_sorted(&sorted, 0.5)?,
            q75: quantile_sorted(&sorted, 0.75)?,
            max,
        })
    }
}

/// Type-specific part of a column profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSummary {
    /// Numeric statistics, absent when the column has no values.
    Numeric(Option<NumericSummary>),
    /// Level counts in descending order of frequency.
    Levels(Vec<(String, usize)>),
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    /// Number of missing values.
    pub n_missing: usize,
    /// Number of distinct non-missing values.
    pub n_unique: usize,
    pub summary: ColumnSummary,
}

impl ColumnProfile {
    /// Profile one named column.
    pub fn from_column(name: &str, column: &Column) -> Self {
        let summary = match column.as_numeric() {
            Some(values) => ColumnSummary::Numeric(NumericSummary::from_values(values)),
            None => {
                let mut levels = level_counts(column).unwrap_or_default();
                levels.sort_by(|a, b| b.1.cmp(&a.1));
                ColumnSummary::Levels(levels)
            }
        };
        Self {
            name: name.to_string(),
            column_type: column.column_type(),
            n_missing: column.n_missing(),
            n_unique: n_unique(column),
            summary,
        }
    }

    /// Fraction of values that are missing.
    pub fn missing_fraction(&self, n_rows: usize) -> f64 {
        if n_rows == 0 {
            0.0
        } else {
            self.n_missing as f64 / n_rows as f64
        }
    }
}

/// Profile of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub n_rows: usize,
    pub n_columns: usize,
    /// Rows that repeat an earlier row in every column.
    pub n_duplicate_rows: usize,
    /// One profile per column, in table order.
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    /// Look up a column profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.n_missing).sum()
    }

    /// Names of columns with at least one missing value.
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.n_missing > 0)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl fmt::Display for TableProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table Profile")?;
        writeln!(f, "  Rows:           {}", self.n_rows)?;
        writeln!(f, "  Columns:        {}", self.n_columns)?;
        writeln!(f, "  Duplicate rows: {}", self.n_duplicate_rows)?;
        writeln!(f, "  Missing cells:  {}", self.total_missing())?;
        for column in &self.columns {
            writeln!(f)?;
            writeln!(
                f,
                "  {} ({}): {} missing ({:.1}%), {} unique",
                column.name,
                column.column_type,
                column.n_missing,
                column.missing_fraction(self.n_rows) * 100.0,
                column.n_unique
            )?;
            match &column.summary {
                ColumnSummary::Numeric(Some(s)) => {
                    writeln!(f, "    count {}  mean {:.4}  std {:.4}", s.count, s.mean, s.std)?;
                    writeln!(
                        f,
                        "    min {:.4}  25% {:.4}  50% {:.4}  75% {:.4}  max {:.4}",
                        s.min, s.q25, s.median, s.q75, s.max
                    )?;
                }
                ColumnSummary::Numeric(None) => writeln!(f, "    no values")?,
                ColumnSummary::Levels(levels) => {
                    for (level, count) in levels.iter().take(10) {
                        writeln!(f, "    {}: {}", level, count)?;
                    }
                    if levels.len() > 10 {
                        writeln!(f, "    ... {} more levels", levels.len() - 10)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Profile every column of a table.
///
/// Column profiles are computed in parallel and returned in column order.
pub fn profile_table(table: &Table) -> TableProfile {
    let columns: Vec<(&str, &Column)> = table.iter().collect();
    let profiles: Vec<ColumnProfile> = columns
        .par_iter()
        .map(|(name, column)| ColumnProfile::from_column(name, column))
        .collect();

    let profile = TableProfile {
        n_rows: table.n_rows(),
        n_columns: table.n_columns(),
        n_duplicate_rows: table.duplicate_row_count(),
        columns: profiles,
    };
    debug!(
        rows = profile.n_rows,
        columns = profile.n_columns,
        missing = profile.total_missing(),
        "profiled table"
    );
    profile
}

fn n_unique(column: &Column) -> usize {
    match column {
        Column::Numeric(values) => values
            .iter()
            .flatten()
            .map(|x| (x + 0.0).to_bits())
            .collect::<HashSet<_>>()
            .len(),
        Column::Categorical(values) => values.iter().flatten().collect::<HashSet<_>>().len(),
        Column::Boolean(values) => values.iter().collect::<HashSet<_>>().len(),
    }
}
