//! Change point detection over an [`ObservedSeries`].
//!
//! Wraps the PELT and binary segmentation searches with configuration
//! validation, the short-series policy, and per-point statistics.

use super::binseg::binary_segmentation;
use super::cost::{CostFunction, PrefixSums};
use super::pelt::{pelt, prune_to_max};
use crate::core::ObservedSeries;
use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Exact penalized search with pruning.
    #[default]
    Pelt,
    /// Greedy recursive splitting.
    BinarySegmentation,
}

/// Configuration for [`ChangePointDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum number of observations between change points.
    pub min_segment_length: usize,
    /// Upper bound on the number of change points (`None` = unbounded).
    pub max_change_points: Option<usize>,
    /// Penalty per change point, in cost units.
    pub penalty: f64,
    /// Series shorter than this are rejected with `InsufficientData`.
    pub min_series_length: usize,
    pub method: DetectionMethod,
    pub cost_fn: CostFunction,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 10,
            max_change_points: None,
            penalty: 10.0,
            min_series_length: 3,
            method: DetectionMethod::Pelt,
            cost_fn: CostFunction::L2,
        }
    }
}

impl DetectorConfig {
    /// Config with a BIC-style penalty derived from the series.
    ///
    /// For squared-error cost the penalty is `2 * sigma^2 * ln(n)`, with the
    /// noise level estimated robustly from first differences so level
    /// shifts do not inflate it. For likelihood costs it is `2 * ln(n)`.
    pub fn with_bic_penalty(values: &[f64], cost_fn: CostFunction) -> Self {
        Self {
            penalty: bic_penalty(values, cost_fn),
            cost_fn,
            ..Default::default()
        }
    }

    /// Set the minimum segment length.
    pub fn min_segment_length(mut self, min_len: usize) -> Self {
        self.min_segment_length = min_len;
        self
    }

    /// Cap the number of change points.
    pub fn max_change_points(mut self, max: usize) -> Self {
        self.max_change_points = Some(max);
        self
    }

    /// Set the penalty.
    pub fn penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Set the search method.
    pub fn method(mut self, method: DetectionMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the cost function.
    pub fn cost_function(mut self, cost_fn: CostFunction) -> Self {
        self.cost_fn = cost_fn;
        self
    }

    /// Set the minimum accepted series length.
    pub fn min_series_length(mut self, len: usize) -> Self {
        self.min_series_length = len;
        self
    }

    /// Reject invalid parameter combinations.
    pub fn validate(&self) -> Result<()> {
        if self.min_segment_length == 0 {
            return Err(AnalysisError::Configuration(
                "min_segment_length must be positive".to_string(),
            ));
        }
        if !self.penalty.is_finite() || self.penalty < 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "penalty must be finite and non-negative, got {}",
                self.penalty
            )));
        }
        if self.max_change_points == Some(0) {
            return Err(AnalysisError::Configuration(
                "max_change_points must be positive when set".to_string(),
            ));
        }
        if self.min_series_length < 2 {
            return Err(AnalysisError::Configuration(
                "min_series_length must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// BIC-style penalty for a series under `cost_fn`.
pub fn bic_penalty(values: &[f64], cost_fn: CostFunction) -> f64 {
    let n = values.len().max(2) as f64;
    if !cost_fn.is_squared_error() {
        return 2.0 * n.ln();
    }
    let mut abs_diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    if abs_diffs.is_empty() {
        return 0.0;
    }
    abs_diffs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = abs_diffs.len() / 2;
    let median = if abs_diffs.len() % 2 == 0 {
        (abs_diffs[mid - 1] + abs_diffs[mid]) / 2.0
    } else {
        abs_diffs[mid]
    };
    // MAD of differences -> noise sigma (differences carry twice the variance)
    let sigma = median / (0.6745 * std::f64::consts::SQRT_2);
    2.0 * sigma * sigma * n.ln()
}

/// A detected shift in the generating process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePoint {
    /// First index of the new regime; always `0 < index < len - 1`.
    pub index: usize,
    /// Date of the observation at `index`.
    pub timestamp: NaiveDate,
    /// Relative cost reduction of the split in `[0, 1]`.
    pub confidence: f64,
    /// Mean of the segment ending just before `index`.
    pub segment_before_mean: f64,
    /// Mean of the segment starting at `index`.
    pub segment_after_mean: f64,
}

impl ChangePoint {
    /// Signed mean shift across the change point.
    pub fn mean_shift(&self) -> f64 {
        self.segment_after_mean - self.segment_before_mean
    }
}

/// Detects structural breaks in a price series.
#[derive(Debug, Clone, Default)]
pub struct ChangePointDetector {
    config: DetectorConfig,
}

impl ChangePointDetector {
    /// Create a detector, validating its configuration.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect change points, ordered by index.
    ///
    /// Series shorter than `min_series_length` fail with
    /// `InsufficientData`; series shorter than `2 * min_segment_length`
    /// have no admissible split and yield an empty result.
    pub fn detect(&self, series: &ObservedSeries) -> Result<Vec<ChangePoint>> {
        let config = &self.config;
        config.validate()?;

        let n = series.len();
        if n < config.min_series_length {
            return Err(AnalysisError::InsufficientData {
                needed: config.min_series_length,
                got: n,
            });
        }
        if n < 2 * config.min_segment_length {
            debug!(n, min_segment_length = config.min_segment_length, "series too short to split");
            return Ok(Vec::new());
        }

        // Segments of two or more keep every change point interior.
        let min_len = config.min_segment_length.max(2);
        let prefix = PrefixSums::new(series.values());

        let indices = match config.method {
            DetectionMethod::Pelt => {
                let found = pelt(&prefix, config.cost_fn, config.penalty, min_len);
                match config.max_change_points {
                    Some(max) => prune_to_max(&prefix, config.cost_fn, found, max),
                    None => found,
                }
            }
            DetectionMethod::BinarySegmentation => binary_segmentation(
                &prefix,
                config.cost_fn,
                config.penalty,
                min_len,
                config.max_change_points,
            ),
        };

        debug!(method = ?config.method, found = indices.len(), "change point search finished");
        Ok(self.describe(series, &prefix, &indices))
    }

    /// Attach dates, segment means and confidence to raw indices.
    fn describe(
        &self,
        series: &ObservedSeries,
        prefix: &PrefixSums,
        indices: &[usize],
    ) -> Vec<ChangePoint> {
        let n = series.len();
        indices
            .iter()
            .enumerate()
            .filter_map(|(i, &index)| {
                let start = if i == 0 { 0 } else { indices[i - 1] };
                let end = indices.get(i + 1).copied().unwrap_or(n);
                Some(ChangePoint {
                    index,
                    timestamp: series.date(index)?,
                    confidence: prefix.split_confidence(start, index, end, self.config.cost_fn),
                    segment_before_mean: prefix.mean(start, index),
                    segment_after_mean: prefix.mean(index, end),
                })
            })
            .collect()
    }
}
