//! Standard scores aligned to the original row positions.

use statrs::statistics::Statistics;

/// Compute `z = (x - mean) / std` for each value.
///
/// Mean and standard deviation are taken over the non-missing values only,
/// using the population standard deviation (divisor `n`). The result is
/// parallel to `values`: a missing input stays `None` at its own position, so
/// the scores line up with the full row set rather than the compacted sample.
///
/// A zero-variance sample gives `Some(NaN)` for every present value.
pub fn zscores(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return vec![None; values.len()];
    }

    let mean = present.iter().mean();
    let std = present.iter().population_std_dev();

    values
        .iter()
        .map(|v| {
            v.map(|x| {
                if std > 0.0 {
                    (x - mean) / std
                } else {
                    f64::NAN
                }
            })
        })
        .collect()
}

/// True when the non-missing values have no spread.
pub fn is_degenerate(values: &[Option<f64>]) -> bool {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return true;
    }
    let std = present.iter().population_std_dev();
    std.is_nan() || std <= 0.0
}
