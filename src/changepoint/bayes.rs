//! Bayesian estimate of a single switch point.
//!
//! Two Gaussian regimes with their own mean and variance, and a uniform
//! prior over the switch location. The per-location evidence uses the
//! profile likelihood (parameters at their MLEs); the number of free
//! parameters is the same for every location, so no complexity correction
//! is needed when normalizing over locations.

use super::cost::PrefixSums;
use crate::core::ObservedSeries;
use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::Serialize;

const VARIANCE_FLOOR: f64 = 1e-10;

/// Posterior summary of a single switch point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BayesianChangePoint {
    /// Maximum a-posteriori switch index (first index of the second regime).
    pub map_index: usize,
    /// Posterior probability mass at `map_index`.
    pub map_probability: f64,
    /// Posterior median of the switch index.
    pub median_index: usize,
    pub timestamp: NaiveDate,
    /// 95% equal-tailed credible interval of the switch index.
    pub credible_interval: (usize, usize),
    pub mean_before: f64,
    pub mean_after: f64,
    pub std_before: f64,
    pub std_after: f64,
    /// Posterior over all indices (zero outside the admissible range).
    pub posterior: Vec<f64>,
}

/// Posterior over a single switch point.
///
/// Each regime holds at least `min_segment_length` (and at least two)
/// observations.
pub fn bayesian_change_point(
    series: &ObservedSeries,
    min_segment_length: usize,
) -> Result<BayesianChangePoint> {
    let n = series.len();
    let min_len = min_segment_length.max(2);
    if n < 2 * min_len {
        return Err(AnalysisError::InsufficientData {
            needed: 2 * min_len,
            got: n,
        });
    }

    let prefix = PrefixSums::new(series.values());
    let log_likelihood = |start: usize, end: usize| {
        let len = (end - start) as f64;
        let var = (prefix.squared_deviation(start, end) / len).max(VARIANCE_FLOOR);
        -0.5 * len * var.ln()
    };

    let taus: Vec<usize> = (min_len..=n - min_len).collect();
    let log_post: Vec<f64> = taus
        .iter()
        .map(|&tau| log_likelihood(0, tau) + log_likelihood(tau, n))
        .collect();

    let max_log = log_post.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = log_post.iter().map(|lp| (lp - max_log).exp()).collect();
    let total: f64 = weights.iter().sum();

    let mut posterior = vec![0.0; n];
    for (&tau, w) in taus.iter().zip(&weights) {
        posterior[tau] = w / total;
    }

    // MAP, earliest on ties
    let map_index = taus
        .iter()
        .copied()
        .fold(taus[0], |best, tau| if posterior[tau] > posterior[best] { tau } else { best });

    let quantile = |q: f64| {
        let mut acc = 0.0;
        for &tau in &taus {
            acc += posterior[tau];
            if acc >= q {
                return tau;
            }
        }
        taus[taus.len() - 1]
    };

    let std = |start: usize, end: usize| {
        (prefix.squared_deviation(start, end) / (end - start) as f64).sqrt()
    };

    Ok(BayesianChangePoint {
        map_index,
        map_probability: posterior[map_index],
        median_index: quantile(0.5),
        timestamp: series
            .date(map_index)
            .ok_or(AnalysisError::InsufficientData { needed: map_index + 1, got: n })?,
        credible_interval: (quantile(0.025), quantile(0.975)),
        mean_before: prefix.mean(0, map_index),
        mean_after: prefix.mean(map_index, n),
        std_before: std(0, map_index),
        std_after: std(map_index, n),
        posterior,
    })
}
