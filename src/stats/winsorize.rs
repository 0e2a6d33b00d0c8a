//! Order-based winsorization.

use crate::error::{EdaError, Result};

/// Replace the extreme tails of a column with the values at the cutoff ranks.
///
/// Non-missing values are ranked in ascending order (ties keep row order).
/// With `n` present values, the lowest `floor(lower * n)` are replaced by the
/// value at that rank and the highest `floor(upper * n)` by the largest value
/// below them. Missing values are left in place.
///
/// # Arguments
/// * `values` - Column values
/// * `lower` - Fraction of the low tail to replace (0.0 to 1.0)
/// * `upper` - Fraction of the high tail to replace (0.0 to 1.0)
///
/// `lower + upper` must be below 1 so that at least one value survives.
pub fn winsorize(values: &[Option<f64>], lower: f64, upper: f64) -> Result<Vec<Option<f64>>> {
    if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) {
        return Err(EdaError::InvalidParameter(
            "Winsorization limits must be between 0 and 1".to_string(),
        ));
    }
    if lower + upper >= 1.0 {
        return Err(EdaError::InvalidParameter(
            "Winsorization limits must sum to less than 1".to_string(),
        ));
    }

    let mut order: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_some())
        .map(|(i, _)| i)
        .collect();
    let n = order.len();
    let mut result = values.to_vec();
    if n == 0 {
        return Ok(result);
    }

    // stable sort: equal values keep their row order
    order.sort_by(|&a, &b| {
        let (x, y) = (values[a].unwrap_or_default(), values[b].unwrap_or_default());
        x.total_cmp(&y)
    });

    let low_count = (lower * n as f64).floor() as usize;
    if low_count > 0 {
        let floor_value = values[order[low_count]];
        for &pos in &order[..low_count] {
            result[pos] = floor_value;
        }
    }

    let high_count = (upper * n as f64).floor() as usize;
    if high_count > 0 {
        let cutoff = n - high_count;
        let ceiling_value = values[order[cutoff - 1]];
        for &pos in &order[cutoff..] {
            result[pos] = ceiling_value;
        }
    }

    Ok(result)
}
