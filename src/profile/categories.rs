//! Level frequencies of categorical and boolean columns.

use crate::data::{Column, ColumnType, Table};
use crate::error::{EdaError, Result};

/// Count how often each level of `column` occurs.
///
/// # Arguments
/// * `table` - Source table
/// * `column` - Categorical or boolean column
/// * `top_n` - Keep only the `top_n` most frequent levels (`None` keeps all)
///
/// # Returns
/// `(level, count)` pairs sorted by descending count. Ties keep the order in
/// which levels first appear. Missing values are not counted.
pub fn category_counts(
    table: &Table,
    column: &str,
    top_n: Option<usize>,
) -> Result<Vec<(String, usize)>> {
    let mut counts = level_counts(table.column(column)?).ok_or_else(|| {
        EdaError::InvalidColumnType {
            column: column.to_string(),
            expected: ColumnType::Categorical.to_string(),
            actual: ColumnType::Numeric.to_string(),
        }
    })?;

    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(n) = top_n {
        counts.truncate(n);
    }
    Ok(counts)
}

/// Level counts in first-appearance order, or `None` for numeric columns.
pub(crate) fn level_counts(column: &Column) -> Option<Vec<(String, usize)>> {
    let labels: Vec<String> = match column {
        Column::Numeric(_) => return None,
        Column::Categorical(values) => values.iter().flatten().cloned().collect(),
        Column::Boolean(values) => values.iter().map(|b| b.to_string()).collect(),
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    Some(counts)
}
