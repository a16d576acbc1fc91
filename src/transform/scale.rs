//! Min-max scaling with a stored inverse.

use serde::{Deserialize, Serialize};

/// Scaled values plus what is needed to map model outputs back to prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleResult {
    /// Values in `[0, 1]`
    pub data: Vec<f64>,
    /// Offset subtracted before scaling (the minimum)
    pub center: f64,
    /// Divisor (the range, or 1 for a constant series)
    pub scale: f64,
}

impl ScaleResult {
    /// All values back on the price scale.
    pub fn inverse(&self) -> Vec<f64> {
        self.data.iter().map(|&x| self.inverse_value(x)).collect()
    }

    /// One value back on the price scale.
    pub fn inverse_value(&self, x: f64) -> f64 {
        x * self.scale + self.center
    }

    /// Scale new values with the stored minimum and range.
    pub fn transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter()
            .map(|&x| (x - self.center) / self.scale)
            .collect()
    }
}

/// Min-max normalization: `(x - min) / (max - min)`.
///
/// A constant series maps to all zeros with a unit scale, so its inverse
/// reproduces the constant exactly.
pub fn normalize(series: &[f64]) -> ScaleResult {
    if series.is_empty() {
        return ScaleResult {
            data: Vec::new(),
            center: 0.0,
            scale: 1.0,
        };
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let scale = if range < 1e-10 { 1.0 } else { range };
    let data = series.iter().map(|&x| (x - min) / scale).collect();

    ScaleResult {
        data,
        center: min,
        scale,
    }
}
