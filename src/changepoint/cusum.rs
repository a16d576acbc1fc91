//! CUSUM of deviations from the series mean.
//!
//! A sustained level shift shows up as a kink in the cumulative sum; the
//! point of largest absolute excursion is a single-shift candidate.

use crate::core::ObservedSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// Cumulative sum of `x_i - mean(x)`.
pub fn cusum_deviation(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values
        .iter()
        .scan(0.0, |acc, &x| {
            *acc += x - mean;
            Some(*acc)
        })
        .collect()
}

/// Peak of the CUSUM path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CusumPeak {
    /// Index of the largest absolute excursion (last index of the old regime).
    pub index: usize,
    pub timestamp: NaiveDate,
    /// Signed CUSUM value at the peak.
    pub value: f64,
}

/// Locate the largest absolute CUSUM excursion; earliest on ties.
///
/// Returns `None` for series shorter than three observations or when the
/// path is flat.
pub fn cusum_peak(series: &ObservedSeries) -> Option<CusumPeak> {
    if series.len() < 3 {
        return None;
    }
    let path = cusum_deviation(series.values());
    // The final value is zero by construction; only interior points count.
    let (index, value) = path[..path.len() - 1]
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if v.abs() <= b.abs() => best,
            _ => Some((i, v)),
        })?;
    if value.abs() < 1e-12 {
        return None;
    }
    Some(CusumPeak {
        index,
        timestamp: series.date(index)?,
        value,
    })
}
