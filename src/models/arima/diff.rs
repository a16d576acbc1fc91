//! Differencing and its inverse for ARIMA models.

/// Apply differencing `d` times.
///
/// Each pass shortens the series by one; a series of length `<= d`
/// becomes empty.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.is_empty() {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Last value of each differencing level `0..d` (level 0 is the series
/// itself). These anchor the integration of forecasts.
pub fn integration_anchors(series: &[f64], d: usize) -> Vec<f64> {
    (0..d)
        .map(|level| difference(series, level).last().copied().unwrap_or(0.0))
        .collect()
}

/// Integrate one step of a `d`-times differenced forecast, updating the
/// anchors in place. Returns the value on the original scale.
pub fn integrate_step(anchors: &mut [f64], value: f64) -> f64 {
    let mut x = value;
    for anchor in anchors.iter_mut().rev() {
        *anchor += x;
        x = *anchor;
    }
    x
}

/// Integrate a differenced forecast back to the original scale.
///
/// `original` is the series the differences were taken from.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let mut anchors = integration_anchors(original, d);
    differenced
        .iter()
        .map(|&v| integrate_step(&mut anchors, v))
        .collect()
}
