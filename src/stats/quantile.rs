//! Sample quantiles with linear interpolation.
//!
//! For a sorted sample `x` of size `n` at probability `p`:
//! ```text
//! h = p * (n - 1)
//! q = x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])
//! ```
//! This is Hyndman & Fan Type 7, the default of most dataframe libraries.
//! Missing values are skipped.

/// Non-missing values in ascending order.
pub fn present_sorted(values: &[Option<f64>]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of an already sorted, non-empty sample.
///
/// Returns `None` for an empty sample or `p` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = p * (n - 1) as f64;
    let lo = (h.floor() as usize).min(n - 1);
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Quantile of a column's non-missing values.
pub fn quantile(values: &[Option<f64>], p: f64) -> Option<f64> {
    quantile_sorted(&present_sorted(values), p)
}

/// Median of a column's non-missing values.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    quantile(values, 0.5)
}
