//! Forecast result structure for holding predictions.

use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Point predictions for one model with optional prediction intervals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Name of the model that produced the forecast.
    pub model_name: String,
    /// Number of steps ahead.
    pub horizon: usize,
    /// Point predictions, one per step.
    pub predictions: Vec<f64>,
    /// `(lower, upper)` bounds per step, when the model provides them.
    pub confidence_intervals: Option<Vec<(f64, f64)>>,
    /// Coverage level of the intervals (e.g. 0.95).
    pub interval_level: Option<f64>,
    /// Dates the predictions refer to, once attached.
    pub dates: Option<Vec<NaiveDate>>,
}

impl ForecastResult {
    /// Create a forecast without intervals.
    pub fn new(model_name: impl Into<String>, predictions: Vec<f64>) -> Self {
        Self {
            model_name: model_name.into(),
            horizon: predictions.len(),
            predictions,
            confidence_intervals: None,
            interval_level: None,
            dates: None,
        }
    }

    /// Create a forecast with intervals at the given level.
    pub fn with_intervals(
        model_name: impl Into<String>,
        predictions: Vec<f64>,
        intervals: Vec<(f64, f64)>,
        level: f64,
    ) -> Result<Self> {
        if intervals.len() != predictions.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: predictions.len(),
                got: intervals.len(),
            });
        }
        Ok(Self {
            confidence_intervals: Some(intervals),
            interval_level: Some(level),
            ..Self::new(model_name, predictions)
        })
    }

    /// Attach calendar dates to the predictions.
    pub fn with_dates(mut self, dates: Vec<NaiveDate>) -> Result<Self> {
        if dates.len() != self.horizon {
            return Err(AnalysisError::DimensionMismatch {
                expected: self.horizon,
                got: dates.len(),
            });
        }
        self.dates = Some(dates);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn has_intervals(&self) -> bool {
        self.confidence_intervals.is_some()
    }

    /// Lower interval bounds, if any.
    pub fn lower(&self) -> Option<Vec<f64>> {
        self.confidence_intervals
            .as_ref()
            .map(|ci| ci.iter().map(|&(lo, _)| lo).collect())
    }

    /// Upper interval bounds, if any.
    pub fn upper(&self) -> Option<Vec<f64>> {
        self.confidence_intervals
            .as_ref()
            .map(|ci| ci.iter().map(|&(_, hi)| hi).collect())
    }
}
