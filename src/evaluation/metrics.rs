//! Accuracy metrics for forecast evaluation.

use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// Accuracy of one forecast against the held-out observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, `None` if any actual value is zero
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// Percentages (MAPE, SMAPE) are on a 0-100 scale.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let mse = mse(actual, predicted);
    Ok(AccuracyMetrics {
        mae: mae(actual, predicted),
        mse,
        rmse: mse.sqrt(),
        mape: mape(actual, predicted),
        smape: smape(actual, predicted),
    })
}

fn mean_of<F>(actual: &[f64], predicted: &[f64], f: F) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| f(a, p))
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_of(actual, predicted, |a, p| (a - p).abs())
}

/// Calculate MSE between two slices.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_of(actual, predicted, |a, p| (a - p).powi(2))
}

/// Calculate RMSE between two slices.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Calculate MAPE between two slices.
///
/// Undefined (`None`) when any actual value is zero or the slices do not
/// line up.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.contains(&0.0) {
        return None;
    }
    let value = 100.0 * mean_of(actual, predicted, |a, p| ((a - p) / a).abs());
    value.is_finite().then_some(value)
}

/// Calculate SMAPE between two slices.
pub fn smape(actual: &[f64], predicted: &[f64]) -> f64 {
    100.0
        * mean_of(actual, predicted, |a, p| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
}
