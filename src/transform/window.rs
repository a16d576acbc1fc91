//! Sliding windows for supervised sequence learning.

/// `(window, next value)` pairs over a series.
///
/// Pair `i` uses `series[i..i + window]` as input and `series[i + window]`
/// as target. Empty when `window == 0` or the series is too short.
pub fn sliding_pairs(series: &[f64], window: usize) -> Vec<(&[f64], f64)> {
    if window == 0 || series.len() <= window {
        return Vec::new();
    }
    (0..series.len() - window)
        .map(|i| (&series[i..i + window], series[i + window]))
        .collect()
}
