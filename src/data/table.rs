//! In-memory table of named, typed columns sharing one row index.

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Type tag for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
    Boolean,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
            ColumnType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A single column of values. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Real-valued column.
    Numeric(Vec<Option<f64>>),
    /// Column of discrete string labels.
    Categorical(Vec<Option<String>>),
    /// Boolean column, used for outlier flags. Never missing.
    Boolean(Vec<bool>),
}

impl Column {
    /// Build a numeric column. NaN inputs are stored as missing.
    pub fn numeric<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Column::Numeric(
            values
                .into_iter()
                .map(|v| if v.is_nan() { None } else { Some(v) })
                .collect(),
        )
    }

    /// Build a categorical column from labels.
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Categorical(values.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
            Column::Boolean(v) => v.len(),
        }
    }

    /// True if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Numeric(_) => ColumnType::Numeric,
            Column::Categorical(_) => ColumnType::Categorical,
            Column::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Check whether the value at `row` is missing.
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(v) => matches!(v.get(row), Some(None)),
            Column::Categorical(v) => matches!(v.get(row), Some(None)),
            Column::Boolean(_) => false,
        }
    }

    /// Count of missing values.
    pub fn n_missing(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Boolean(_) => 0,
        }
    }

    /// Try to view as numeric values.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Try to view as categorical labels.
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Categorical(v) => Some(v),
            _ => None,
        }
    }

    /// Try to view as booleans.
    pub fn as_boolean(&self) -> Option<&[bool]> {
        match self {
            Column::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Select values at the given positions, in order.
    pub fn take(&self, positions: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(positions.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(positions.iter().map(|&i| v[i].clone()).collect())
            }
            Column::Boolean(v) => Column::Boolean(positions.iter().map(|&i| v[i]).collect()),
        }
    }

    fn cell_key(&self, row: usize) -> CellKey {
        match self {
            Column::Numeric(v) => match v[row] {
                // normalise -0.0 so it hashes equal to 0.0
                Some(x) => CellKey::Number((x + 0.0).to_bits()),
                None => CellKey::Missing,
            },
            Column::Categorical(v) => match &v[row] {
                Some(s) => CellKey::Label(s.clone()),
                None => CellKey::Missing,
            },
            Column::Boolean(v) => CellKey::Flag(v[row]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Number(u64),
    Label(String),
    Flag(bool),
}

/// An ordered collection of named columns sharing a row index.
///
/// The index is a stable label per row. It starts as `0..n` and survives
/// row filtering, so a row keeps its label after other rows are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Row labels, one per row.
    index: Vec<usize>,
    /// Column names in order.
    names: Vec<String>,
    /// Column data, parallel to `names`.
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, column)` pairs with a default `0..n` index.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Builder-style variant of [`Table::push_column`].
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Append a new column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn push_column<S: Into<String>>(&mut self, name: S, column: Column) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(EdaError::DuplicateColumn(name));
        }
        if self.columns.is_empty() && self.index.is_empty() {
            self.index = (0..column.len()).collect();
        } else if column.len() != self.n_rows() {
            return Err(EdaError::DimensionMismatch {
                expected: self.n_rows(),
                actual: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Replace an existing column or append a new one.
    pub fn set_column<S: Into<String>>(&mut self, name: S, column: Column) -> Result<()> {
        let name = name.into();
        match self.position(&name) {
            Some(pos) => {
                if column.len() != self.n_rows() {
                    return Err(EdaError::DimensionMismatch {
                        expected: self.n_rows(),
                        actual: column.len(),
                    });
                }
                self.columns[pos] = column;
                Ok(())
            }
            None => self.push_column(name, column),
        }
    }

    /// Replace the row index. Labels must be unique and match the row count.
    pub fn set_index(&mut self, index: Vec<usize>) -> Result<()> {
        if index.len() != self.n_rows() {
            return Err(EdaError::DimensionMismatch {
                expected: self.n_rows(),
                actual: index.len(),
            });
        }
        let unique: HashSet<usize> = index.iter().copied().collect();
        if unique.len() != index.len() {
            return Err(EdaError::InvalidParameter(
                "Row index labels must be unique".to_string(),
            ));
        }
        self.index = index;
        Ok(())
    }

    /// Row labels in order.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterate over `(name, column)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|pos| &self.columns[pos])
            .ok_or_else(|| EdaError::MissingColumn(name.to_string()))
    }

    /// Get a numeric column's values.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        let column = self.column(name)?;
        column
            .as_numeric()
            .ok_or_else(|| type_error(name, ColumnType::Numeric, column.column_type()))
    }

    /// Get a categorical column's labels.
    pub fn categorical(&self, name: &str) -> Result<&[Option<String>]> {
        let column = self.column(name)?;
        column
            .as_categorical()
            .ok_or_else(|| type_error(name, ColumnType::Categorical, column.column_type()))
    }

    /// Get a boolean column's values.
    pub fn boolean(&self, name: &str) -> Result<&[bool]> {
        let column = self.column(name)?;
        column
            .as_boolean()
            .ok_or_else(|| type_error(name, ColumnType::Boolean, column.column_type()))
    }

    /// Position of a row label, if present.
    pub fn row_position(&self, label: usize) -> Option<usize> {
        self.index.iter().position(|&l| l == label)
    }

    /// Keep rows where `keep` is true, across every column.
    pub fn retain_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.n_rows() {
            return Err(EdaError::DimensionMismatch {
                expected: self.n_rows(),
                actual: keep.len(),
            });
        }
        let positions: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter(|(_, &k)| k)
            .map(|(i, _)| i)
            .collect();
        Ok(self.select_rows(&positions))
    }

    /// Select rows by position, in the given order. Surviving rows keep
    /// their index labels.
    pub fn take_rows(&self, positions: &[usize]) -> Result<Self> {
        let n_rows = self.n_rows();
        if let Some(&bad) = positions.iter().find(|&&i| i >= n_rows) {
            return Err(EdaError::InvalidParameter(format!(
                "Row position {} out of range for {} rows",
                bad, n_rows
            )));
        }
        Ok(self.select_rows(positions))
    }

    fn select_rows(&self, positions: &[usize]) -> Self {
        Self {
            index: positions.iter().map(|&i| self.index[i]).collect(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(positions)).collect(),
        }
    }

    /// Number of rows that repeat an earlier row in every column.
    pub fn duplicate_row_count(&self) -> usize {
        self.n_rows() - self.first_occurrences().len()
    }

    /// Drop rows that repeat an earlier row, keeping the first occurrence.
    pub fn drop_duplicate_rows(&self) -> Self {
        let positions = self.first_occurrences();
        self.select_rows(&positions)
    }

    fn first_occurrences(&self) -> Vec<usize> {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
        (0..self.n_rows())
            .filter(|&row| {
                let key: Vec<CellKey> = self.columns.iter().map(|c| c.cell_key(row)).collect();
                seen.insert(key)
            })
            .collect()
    }
}

fn type_error(name: &str, expected: ColumnType, actual: ColumnType) -> EdaError {
    EdaError::InvalidColumnType {
        column: name.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
