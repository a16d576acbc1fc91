//! Cost functions for changepoint detection.
//!
//! Cost functions evaluate the "cost" of fitting a constant-parameter model
//! to a segment of data. Lower cost indicates a better fit.

use serde::{Deserialize, Serialize};

/// Variance floor so constant segments keep a finite log-likelihood.
const VARIANCE_FLOOR: f64 = 1e-10;

/// Cost function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    /// Sum of squared deviations from the segment mean. Detects mean shifts.
    #[default]
    L2,
    /// Gaussian negative log-likelihood with a per-segment variance:
    /// `n * ln(variance)`. Detects variance changes.
    Normal,
    /// Joint mean and variance likelihood: `n * (1 + ln(variance))`.
    MeanVariance,
}

impl CostFunction {
    /// Whether the cost is measured in squared price units (as opposed to
    /// log-likelihood units).
    pub fn is_squared_error(&self) -> bool {
        matches!(self, CostFunction::L2)
    }
}

/// Compute the cost of a segment using the specified cost function.
pub fn segment_cost(segment: &[f64], cost_fn: CostFunction) -> f64 {
    match cost_fn {
        CostFunction::L2 => l2_cost(segment),
        CostFunction::Normal => normal_cost(segment),
        CostFunction::MeanVariance => mean_variance_cost(segment),
    }
}

/// L2 cost: sum of squared deviations from mean.
pub fn l2_cost(segment: &[f64]) -> f64 {
    if segment.is_empty() {
        return 0.0;
    }

    let mean = segment.iter().sum::<f64>() / segment.len() as f64;
    segment.iter().map(|x| (x - mean).powi(2)).sum()
}

/// Normal (Gaussian) cost: `n * ln(variance)`, constant terms dropped.
pub fn normal_cost(segment: &[f64]) -> f64 {
    let n = segment.len();
    if n < 2 {
        return 0.0;
    }
    let variance = l2_cost(segment) / n as f64;
    n as f64 * variance.max(VARIANCE_FLOOR).ln()
}

/// Mean-variance cost: `n * (1 + ln(variance))`.
pub fn mean_variance_cost(segment: &[f64]) -> f64 {
    let n = segment.len();
    if n < 2 {
        return 0.0;
    }
    let variance = l2_cost(segment) / n as f64;
    n as f64 * (1.0 + variance.max(VARIANCE_FLOOR).ln())
}

/// Prefix sums giving O(1) segment costs.
///
/// All supported costs depend only on a segment's length, sum and sum of
/// squares, so one pass over the series serves every query.
#[derive(Debug, Clone)]
pub struct PrefixSums {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl PrefixSums {
    pub fn new(series: &[f64]) -> Self {
        let mut sum = Vec::with_capacity(series.len() + 1);
        let mut sum_sq = Vec::with_capacity(series.len() + 1);
        sum.push(0.0);
        sum_sq.push(0.0);
        for &x in series {
            sum.push(sum[sum.len() - 1] + x);
            sum_sq.push(sum_sq[sum_sq.len() - 1] + x * x);
        }
        Self { sum, sum_sq }
    }

    /// Number of observations covered.
    pub fn len(&self) -> usize {
        self.sum.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean of `series[start..end]`.
    pub fn mean(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return f64::NAN;
        }
        (self.sum[end] - self.sum[start]) / (end - start) as f64
    }

    /// Sum of squared deviations from the mean of `series[start..end]`.
    pub fn squared_deviation(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        let n = (end - start) as f64;
        let s = self.sum[end] - self.sum[start];
        let ss = self.sum_sq[end] - self.sum_sq[start];
        (ss - s * s / n).max(0.0)
    }

    /// Cost of `series[start..end]` under `cost_fn`.
    pub fn cost(&self, start: usize, end: usize, cost_fn: CostFunction) -> f64 {
        let n = end.saturating_sub(start);
        if n == 0 {
            return 0.0;
        }
        let l2 = self.squared_deviation(start, end);
        match cost_fn {
            CostFunction::L2 => l2,
            CostFunction::Normal | CostFunction::MeanVariance if n < 2 => 0.0,
            CostFunction::Normal => n as f64 * (l2 / n as f64).max(VARIANCE_FLOOR).ln(),
            CostFunction::MeanVariance => {
                n as f64 * (1.0 + (l2 / n as f64).max(VARIANCE_FLOOR).ln())
            }
        }
    }

    /// Cost reduction from splitting `[start, end)` at `split`.
    pub fn split_gain(&self, start: usize, split: usize, end: usize, cost_fn: CostFunction) -> f64 {
        self.cost(start, end, cost_fn) - self.cost(start, split, cost_fn) - self.cost(split, end, cost_fn)
    }

    /// Relative strength of a split in `[0, 1]`.
    ///
    /// For squared error this is the share of the segment's dispersion the
    /// split explains. For likelihood costs the gain per observation is a log
    /// variance ratio, mapped through `1 - exp(-gain / n)`.
    pub fn split_confidence(
        &self,
        start: usize,
        split: usize,
        end: usize,
        cost_fn: CostFunction,
    ) -> f64 {
        let gain = self.split_gain(start, split, end, cost_fn).max(0.0);
        let confidence = if cost_fn.is_squared_error() {
            let baseline = self.cost(start, end, cost_fn);
            if baseline <= 0.0 {
                0.0
            } else {
                gain / baseline
            }
        } else {
            1.0 - (-gain / (end - start) as f64).exp()
        };
        confidence.clamp(0.0, 1.0)
    }
}

/// Total cost of a segmentation given by its changepoints.
pub fn total_cost(series: &[f64], changepoints: &[usize], cost_fn: CostFunction) -> f64 {
    let prefix = PrefixSums::new(series);
    let mut bounds = Vec::with_capacity(changepoints.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(changepoints);
    bounds.push(series.len());
    bounds
        .windows(2)
        .map(|w| prefix.cost(w[0], w[1], cost_fn))
        .sum()
}
