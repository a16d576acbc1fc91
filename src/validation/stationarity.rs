//! Unit-root testing.
//!
//! The augmented Dickey-Fuller regression decides how many differences a
//! price series needs before an ARMA model is appropriate.

use crate::utils::ols::ols_fit;
use serde::Serialize;

/// Result of a stationarity test.
#[derive(Debug, Clone, Serialize)]
pub struct StationarityResult {
    /// Test statistic
    pub statistic: f64,
    /// P-value (approximate)
    pub p_value: f64,
    /// Number of lagged differences used
    pub lags: usize,
    /// Whether the unit root is rejected at 5%
    pub is_stationary: bool,
    pub critical_values: CriticalValues,
}

/// Critical values at common significance levels.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CriticalValues {
    pub cv_1pct: f64,
    pub cv_5pct: f64,
    pub cv_10pct: f64,
}

/// MacKinnon critical values for the constant, no-trend case.
const ADF_CRITICAL: CriticalValues = CriticalValues {
    cv_1pct: -3.43,
    cv_5pct: -2.86,
    cv_10pct: -2.57,
};

impl StationarityResult {
    fn undetermined(lags: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags,
            is_stationary: false,
            critical_values: ADF_CRITICAL,
        }
    }
}

/// Augmented Dickey-Fuller test for a unit root.
///
/// Regresses `dy_t` on a constant, `y_{t-1}` and `k` lagged differences,
/// choosing `k <= max_lags` by AIC over a common sample. The null
/// hypothesis is a unit root; rejection implies stationarity.
///
/// A constant series is stationary by definition. Default `max_lags` is
/// `(n - 1)^(1/3)`.
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> StationarityResult {
    let n = series.len();
    if n < 6 {
        return StationarityResult::undetermined(0);
    }

    let spread = series.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - series.iter().copied().fold(f64::INFINITY, f64::min);
    if spread <= 1e-12 * series[0].abs().max(1.0) {
        return StationarityResult {
            statistic: f64::NEG_INFINITY,
            p_value: 0.0,
            lags: 0,
            is_stationary: true,
            critical_values: ADF_CRITICAL,
        };
    }

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let max_lags = max_lags
        .unwrap_or_else(|| ((n - 1) as f64).powf(1.0 / 3.0).floor() as usize)
        .min(diff.len().saturating_sub(4) / 2);

    // Common sample: rows t = max_lags..diff.len()
    let y: Vec<f64> = diff[max_lags..].to_vec();
    let design = |lags: usize| -> Vec<Vec<f64>> {
        (max_lags..diff.len())
            .map(|t| {
                let mut row = Vec::with_capacity(lags + 2);
                row.push(1.0);
                row.push(series[t]);
                row.extend((1..=lags).map(|i| diff[t - i]));
                row
            })
            .collect()
    };

    let best = (0..=max_lags)
        .filter_map(|lags| {
            let fit = ols_fit(&y, &design(lags)).ok()?;
            let m = fit.n as f64;
            let k = (lags + 2) as f64;
            let aic = m * (fit.rss.max(1e-300) / m).ln() + 2.0 * k;
            Some((lags, aic, fit))
        })
        .fold(None, |best: Option<(usize, f64, _)>, cand| match best {
            Some(ref b) if b.1 <= cand.1 => best,
            _ => Some(cand),
        });

    let Some((lags, _, fit)) = best else {
        return StationarityResult::undetermined(0);
    };

    let beta = fit.coefficients[1];
    let total: f64 = y.iter().map(|v| v * v).sum();
    let perfect_fit = fit.rss <= 1e-20 * total.max(1e-300);
    let statistic = match fit.t_statistic(1) {
        Some(t) if !perfect_fit => t,
        // Perfect fit: only a clearly mean-reverting level coefficient counts
        _ if beta < -1e-8 => f64::NEG_INFINITY,
        _ => return StationarityResult::undetermined(lags),
    };

    StationarityResult {
        statistic,
        p_value: adf_p_value(statistic),
        lags,
        is_stationary: statistic < ADF_CRITICAL.cv_5pct,
        critical_values: ADF_CRITICAL,
    }
}

/// Coarse p-value from the tabulated distribution of the ADF statistic.
fn adf_p_value(t_stat: f64) -> f64 {
    if t_stat.is_nan() {
        return f64::NAN;
    }
    if t_stat < -4.0 {
        0.001
    } else if t_stat < -3.43 {
        0.01
    } else if t_stat < -2.86 {
        0.05
    } else if t_stat < -2.57 {
        0.10
    } else if t_stat < -1.94 {
        0.20
    } else if t_stat < -1.62 {
        0.30
    } else if t_stat < -1.28 {
        0.40
    } else if t_stat < -0.84 {
        0.50
    } else if t_stat < 0.0 {
        0.70
    } else {
        0.90 + 0.05 * (1.0 - (-t_stat).exp())
    }
}

/// Smallest number of differences (at most `max_d`) after which the ADF
/// test rejects a unit root; `max_d` if it never does.
pub fn differencing_order(series: &[f64], max_d: usize) -> usize {
    let mut current = series.to_vec();
    for d in 0..max_d {
        if adf_test(&current, None).is_stationary {
            return d;
        }
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    max_d
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-noise in [-1, 1].
    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn adf_stationary_series() {
        let e = noise(300, 7);
        let mut y = vec![0.0];
        for t in 1..300 {
            y.push(0.3 * y[t - 1] + e[t]);
        }
        let result = adf_test(&y, None);
        assert!(result.is_stationary, "statistic = {}", result.statistic);
        assert!(result.p_value <= 0.05);
    }

    #[test]
    fn adf_random_walk() {
        let e = noise(300, 11);
        let walk: Vec<f64> = e
            .iter()
            .scan(100.0, |acc, x| {
                *acc += x;
                Some(*acc)
            })
            .collect();
        let result = adf_test(&walk, None);
        assert!(
            result.statistic > result.critical_values.cv_1pct,
            "statistic = {}",
            result.statistic
        );
    }

    #[test]
    fn adf_constant_series_is_stationary() {
        let result = adf_test(&[42.0; 50], None);
        assert!(result.is_stationary);
    }

    #[test]
    fn adf_short_series_is_undetermined() {
        let result = adf_test(&[1.0, 2.0, 3.0], None);
        assert!(result.statistic.is_nan());
        assert!(!result.is_stationary);
    }

    #[test]
    fn differencing_order_of_trend_and_constant() {
        let trend: Vec<f64> = (0..100).map(|t| 10.0 + 2.0 * t as f64).collect();
        assert_eq!(differencing_order(&trend, 2), 1);
        assert_eq!(differencing_order(&[42.0; 40], 2), 0);
    }
}
