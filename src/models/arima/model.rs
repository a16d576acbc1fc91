//! ARIMA (Autoregressive Integrated Moving Average) model.

use crate::core::{ForecastResult, ObservedSeries};
use crate::error::{AnalysisError, Result};
use crate::models::arima::diff::{difference, integrate_step, integration_anchors};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::validation::stationarity::adf_test;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

const VARIANCE_FLOOR: f64 = 1e-12;

/// ARIMA model specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ARIMASpec {
    /// Create a new ARIMA specification.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Total number of parameters.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1 // AR + MA + intercept
    }

    /// Shortest series this order can be fitted to.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + self.num_params() + 1
    }
}

impl Default for ARIMASpec {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl std::fmt::Display for ARIMASpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Estimated parameters and in-sample state.
#[derive(Debug, Clone)]
struct ArimaFit {
    ar: Vec<f64>,
    ma: Vec<f64>,
    /// Mean of the differenced series.
    intercept: f64,
    differenced: Vec<f64>,
    /// In-sample one-step predictions on the differenced scale.
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    /// Last value of each differencing level.
    anchors: Vec<f64>,
    residual_variance: f64,
    aic: f64,
    bic: f64,
    iterations: usize,
}

/// ARIMA forecasting model.
///
/// ARIMA(p, d, q) combines:
/// - AR(p): Autoregressive component
/// - I(d): Differencing for stationarity
/// - MA(q): Moving average component
///
/// Parameters are estimated by conditional sum of squares (CSS) with a
/// bounded Nelder-Mead search.
#[derive(Debug, Clone)]
pub struct ARIMA {
    spec: ARIMASpec,
    max_iterations: usize,
    tolerance: f64,
    require_stationary_input: bool,
    interval_level: f64,
    /// First differenced index entering the likelihood.
    conditioning: usize,
    fit: Option<ArimaFit>,
}

impl ARIMA {
    /// Create a new ARIMA model.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::from_spec(ARIMASpec::new(p, d, q))
    }

    pub fn from_spec(spec: ARIMASpec) -> Self {
        Self {
            spec,
            max_iterations: 2000,
            tolerance: 1e-8,
            require_stationary_input: false,
            interval_level: 0.95,
            conditioning: 0,
            fit: None,
        }
    }

    /// Create an AR(p) model (ARIMA with d=0, q=0).
    pub fn ar(p: usize) -> Self {
        Self::new(p, 0, 0)
    }

    /// Iteration budget for the optimizer.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Relative convergence tolerance for the optimizer.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject inputs whose differenced series still has a unit root.
    pub fn require_stationary_input(mut self, require: bool) -> Self {
        self.require_stationary_input = require;
        self
    }

    /// Coverage of the prediction intervals.
    pub fn with_interval_level(mut self, level: f64) -> Self {
        self.interval_level = level;
        self
    }

    /// Start the conditional likelihood at differenced index `start`
    /// instead of `max(p, q)`.
    ///
    /// Models of different orders fitted with the same start are scored
    /// on the same observations, so their AIC/BIC values are comparable.
    pub fn with_conditioning(mut self, start: usize) -> Self {
        self.conditioning = start;
        self
    }

    fn score_start(&self) -> usize {
        self.spec.p.max(self.spec.q).max(self.conditioning)
    }

    /// Shortest series this model can be fitted to, given its
    /// conditioning start.
    pub fn required_observations(&self) -> usize {
        self.spec.d + self.score_start() + self.spec.num_params() + 1
    }

    /// Get the model specification.
    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    /// Get AR coefficients (empty before fitting).
    pub fn ar_coefficients(&self) -> &[f64] {
        self.fit.as_ref().map(|f| f.ar.as_slice()).unwrap_or(&[])
    }

    /// Get MA coefficients (empty before fitting).
    pub fn ma_coefficients(&self) -> &[f64] {
        self.fit.as_ref().map(|f| f.ma.as_slice()).unwrap_or(&[])
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.intercept)
    }

    /// Mean squared one-step residual on the differenced scale.
    pub fn residual_variance(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.residual_variance)
    }

    pub fn aic(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.aic)
    }

    pub fn bic(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.bic)
    }

    /// Optimizer iterations used by the last fit.
    pub fn iterations(&self) -> Option<usize> {
        self.fit.as_ref().map(|f| f.iterations)
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(AnalysisError::Configuration(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(AnalysisError::Configuration(
                "tolerance must be positive and finite".to_string(),
            ));
        }
        if !(self.interval_level > 0.0 && self.interval_level < 1.0) {
            return Err(AnalysisError::Configuration(format!(
                "interval level must lie in (0, 1), got {}",
                self.interval_level
            )));
        }
        Ok(())
    }

    /// One-step predictions and residuals for given parameters.
    ///
    /// The first `max(p, q)` residuals are zero.
    fn one_step(
        diff_series: &[f64],
        ar: &[f64],
        ma: &[f64],
        intercept: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let n = diff_series.len();
        let start = ar.len().max(ma.len());
        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let mut pred = intercept;
            for (i, phi) in ar.iter().enumerate() {
                pred += phi * (diff_series[t - 1 - i] - intercept);
            }
            for (i, theta) in ma.iter().enumerate() {
                pred += theta * residuals[t - 1 - i];
            }
            fitted[t] = pred;
            residuals[t] = diff_series[t] - pred;
        }
        (fitted, residuals)
    }

    /// Conditional sum of squares from `start` onward.
    fn css(diff_series: &[f64], ar: &[f64], ma: &[f64], intercept: f64, start: usize) -> f64 {
        let (_, residuals) = Self::one_step(diff_series, ar, ma, intercept);
        residuals[start..].iter().map(|e| e * e).sum()
    }

    /// Estimate `(intercept, ar, ma, iterations)` by CSS.
    fn estimate(&self, diff_series: &[f64]) -> Result<(f64, Vec<f64>, Vec<f64>, usize)> {
        let (p, q) = (self.spec.p, self.spec.q);
        let start = self.score_start();
        let scored = &diff_series[start..];
        let mean = scored.iter().sum::<f64>() / scored.len() as f64;

        if p == 0 && q == 0 {
            return Ok((mean, vec![], vec![], 0));
        }

        let mut initial = vec![0.0; p + q + 1];
        initial[0] = mean;
        for i in 0..p {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        for i in 0..q {
            initial[1 + p + i] = 0.1 / (i + 1) as f64;
        }

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let config = NelderMeadConfig {
            max_iter: self.max_iterations,
            tolerance: self.tolerance,
            ..Default::default()
        };

        let result = nelder_mead(
            |params| {
                Self::css(diff_series, &params[1..1 + p], &params[1 + p..], params[0], start)
            },
            &initial,
            Some(&bounds),
            config,
        );

        if !result.converged {
            return Err(AnalysisError::Convergence {
                iterations: result.iterations,
            });
        }

        let point = result.optimal_point;
        Ok((
            point[0],
            point[1..1 + p].to_vec(),
            point[1 + p..].to_vec(),
            result.iterations,
        ))
    }

    /// Psi-weights of the integrated process, `psi_0 = 1`.
    fn psi_weights(&self, fit: &ArimaFit, horizon: usize) -> Vec<f64> {
        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return psi;
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut value = fit.ma.get(j - 1).copied().unwrap_or(0.0);
            for (i, phi) in fit.ar.iter().enumerate().take(j) {
                value += phi * psi[j - 1 - i];
            }
            psi[j] = value;
        }
        // (1 - B)^-d: cumulative sums
        for _ in 0..self.spec.d {
            let mut acc = 0.0;
            for w in psi.iter_mut() {
                acc += *w;
                *w = acc;
            }
        }
        psi
    }

    /// Lazy point forecasts for `horizon` steps.
    ///
    /// The iterator owns a snapshot of the fitted state, so it can be
    /// cloned or rebuilt to replay the same sequence.
    pub fn forecast_iter(&self, horizon: usize) -> Result<ArimaForecastIter> {
        let fit = self.fit.as_ref().ok_or(AnalysisError::FitRequired)?;
        let (p, q) = (self.spec.p, self.spec.q);
        let history = fit.differenced[fit.differenced.len() - p..].to_vec();
        let shocks = fit.residuals[fit.residuals.len() - q..].to_vec();
        Ok(ArimaForecastIter {
            ar: fit.ar.clone(),
            ma: fit.ma.clone(),
            intercept: fit.intercept,
            history,
            shocks,
            anchors: fit.anchors.clone(),
            remaining: horizon,
        })
    }

    /// Point forecasts with intervals at `level`.
    pub fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        let fit = self.fit.as_ref().ok_or(AnalysisError::FitRequired)?;
        if !(level > 0.0 && level < 1.0) {
            return Err(AnalysisError::Configuration(format!(
                "interval level must lie in (0, 1), got {level}"
            )));
        }
        let predictions: Vec<f64> = self.forecast_iter(horizon)?.collect();

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| AnalysisError::Configuration(e.to_string()))?;
        let z = normal.inverse_cdf((1.0 + level) / 2.0);

        let psi = self.psi_weights(fit, horizon);
        let mut cumulative = 0.0;
        let intervals = predictions
            .iter()
            .zip(&psi)
            .map(|(&pred, w)| {
                cumulative += w * w;
                let se = (fit.residual_variance * cumulative).sqrt();
                (pred - z * se, pred + z * se)
            })
            .collect();

        ForecastResult::with_intervals(self.name(), predictions, intervals, level)
    }
}

impl Default for ARIMA {
    fn default() -> Self {
        Self::from_spec(ARIMASpec::default())
    }
}

/// True when every root of `1 - phi_1 z - ... - phi_p z^p` lies outside
/// the unit circle (step-down recursion on the reflection coefficients).
pub fn is_stationary_ar(ar: &[f64]) -> bool {
    let mut a = ar.to_vec();
    for k in (1..=a.len()).rev() {
        let kappa = a[k - 1];
        if !kappa.is_finite() || kappa.abs() >= 1.0 {
            return false;
        }
        let denom = 1.0 - kappa * kappa;
        let prev: Vec<f64> = (0..k - 1)
            .map(|j| (a[j] + kappa * a[k - 2 - j]) / denom)
            .collect();
        a = prev;
    }
    true
}

impl Forecaster for ARIMA {
    fn fit(&mut self, series: &ObservedSeries) -> Result<()> {
        self.validate()?;
        self.fit = None;

        let values = series.values();
        let needed = self.required_observations();
        if values.len() < needed {
            return Err(AnalysisError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        let diff_series = difference(values, self.spec.d);
        if self.require_stationary_input {
            let adf = adf_test(&diff_series, None);
            if !adf.is_stationary {
                return Err(AnalysisError::NonStationary(format!(
                    "unit root not rejected after {} difference(s) (ADF statistic {:.3})",
                    self.spec.d, adf.statistic
                )));
            }
        }

        let (intercept, ar, ma, iterations) = self.estimate(&diff_series)?;
        if !is_stationary_ar(&ar) {
            return Err(AnalysisError::NonStationary(format!(
                "fitted AR polynomial {ar:?} has a root on or inside the unit circle"
            )));
        }

        let (fitted, residuals) = Self::one_step(&diff_series, &ar, &ma, intercept);
        let valid = &residuals[self.score_start()..];
        let n_eff = valid.len() as f64;
        let residual_variance = valid.iter().map(|r| r * r).sum::<f64>() / n_eff;

        let k = self.spec.num_params() as f64;
        let ll = -0.5
            * n_eff
            * (1.0 + residual_variance.max(VARIANCE_FLOOR).ln() + (2.0 * std::f64::consts::PI).ln());

        debug!(
            order = %self.spec,
            iterations,
            residual_variance,
            "ARIMA fitted"
        );

        self.fit = Some(ArimaFit {
            ar,
            ma,
            intercept,
            anchors: integration_anchors(values, self.spec.d),
            differenced: diff_series,
            fitted,
            residuals,
            residual_variance,
            aic: -2.0 * ll + 2.0 * k,
            bic: -2.0 * ll + k * n_eff.ln(),
            iterations,
        });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<ForecastResult> {
        self.predict_with_intervals(horizon, self.interval_level)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}

/// Point forecasts of a fitted ARIMA model, one step at a time.
///
/// Future shocks are zero, so MA terms fade out after `q` steps.
#[derive(Debug, Clone)]
pub struct ArimaForecastIter {
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    /// Last `p` values on the differenced scale, oldest first.
    history: Vec<f64>,
    /// Last `q` residuals, oldest first.
    shocks: Vec<f64>,
    anchors: Vec<f64>,
    remaining: usize,
}

impl Iterator for ArimaForecastIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let mut pred = self.intercept;
        for (phi, past) in self.ar.iter().zip(self.history.iter().rev()) {
            pred += phi * (past - self.intercept);
        }
        for (theta, shock) in self.ma.iter().zip(self.shocks.iter().rev()) {
            pred += theta * shock;
        }

        if !self.history.is_empty() {
            self.history.remove(0);
            self.history.push(pred);
        }
        if !self.shocks.is_empty() {
            self.shocks.remove(0);
            self.shocks.push(0.0);
        }

        Some(integrate_step(&mut self.anchors, pred))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ArimaForecastIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cadence;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> ObservedSeries {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        ObservedSeries::from_values(start, values, Cadence::Daily).unwrap()
    }

    #[test]
    fn arima_basic_fit() {
        let values: Vec<f64> = (0..50)
            .map(|i| 10.0 + 0.5 * i as f64 + (i as f64 * 0.3).sin())
            .collect();
        let mut model = ARIMA::new(1, 1, 1);
        model.fit(&series(values)).unwrap();

        assert_eq!(model.ar_coefficients().len(), 1);
        assert_eq!(model.ma_coefficients().len(), 1);

        let forecast = model.predict(5).unwrap();
        assert_eq!(forecast.horizon, 5);
        assert_eq!(forecast.model_name, "ARIMA");
    }

    #[test]
    fn arima_ar1() {
        // y_t = 0.7 * y_{t-1} + e_t
        let mut values = vec![10.0];
        for i in 1..100 {
            values.push(0.7 * values[i - 1] + (i as f64 * 0.1).sin());
        }
        let mut model = ARIMA::ar(1);
        model.fit(&series(values)).unwrap();

        assert!(model.ar_coefficients()[0] > 0.3);
    }

    #[test]
    fn differencing_removes_linear_trend() {
        let values: Vec<f64> = (0..100).map(|i| 10.0 + 2.0 * i as f64).collect();

        let mut integrated = ARIMA::new(1, 1, 0).with_max_iterations(20_000);
        integrated.fit(&series(values.clone())).unwrap();
        let mut level = ARIMA::new(1, 0, 0).with_max_iterations(20_000);
        level.fit(&series(values)).unwrap();

        assert!(integrated.residual_variance().unwrap() < 1e-4);
        assert!(level.residual_variance().unwrap() > 1e-2);
    }

    #[test]
    fn trend_forecast_continues_trend() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + 2.0 * i as f64).collect();
        let mut model = ARIMA::new(1, 1, 0);
        model.fit(&series(values)).unwrap();

        let preds = model.predict(3).unwrap().predictions;
        assert_relative_eq!(preds[0], 110.0, epsilon = 1e-6);
        assert_relative_eq!(preds[2], 114.0, epsilon = 1e-6);
    }

    #[test]
    fn constant_series_is_forecast_exactly() {
        let mut model = ARIMA::default();
        model.fit(&series(vec![42.0; 60])).unwrap();
        let forecast = model.predict(10).unwrap();
        for p in &forecast.predictions {
            assert_relative_eq!(*p, 42.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn forecast_iter_is_lazy_and_replayable() {
        let values: Vec<f64> = (0..60)
            .map(|i| 50.0 + (i as f64 * 0.4).sin() * 3.0)
            .collect();
        let mut model = ARIMA::new(2, 0, 1);
        model.fit(&series(values)).unwrap();

        let iter = model.forecast_iter(7).unwrap();
        assert_eq!(iter.len(), 7);
        let replay = iter.clone();
        let first: Vec<f64> = iter.collect();
        let second: Vec<f64> = replay.collect();
        assert_eq!(first, second);
        assert_eq!(first, model.predict(7).unwrap().predictions);
        assert_eq!(model.forecast_iter(7).unwrap().count(), 7);
    }

    #[test]
    fn intervals_widen_with_horizon() {
        let values: Vec<f64> = (0..80)
            .map(|i| 10.0 + i as f64 * 0.5 + (i as f64 * 0.7).sin())
            .collect();
        let mut model = ARIMA::new(1, 1, 1);
        model.fit(&series(values)).unwrap();

        let forecast = model.predict(10).unwrap();
        assert_eq!(forecast.interval_level, Some(0.95));
        let intervals = forecast.confidence_intervals.unwrap();
        let widths: Vec<f64> = intervals.iter().map(|(lo, hi)| hi - lo).collect();
        for (w, (lo, hi)) in widths.iter().zip(&intervals) {
            assert!(lo.is_finite() && hi.is_finite());
            assert!(*w >= 0.0);
        }
        assert!(widths[9] > widths[0]);
    }

    #[test]
    fn psi_weights_of_random_walk_are_ones() {
        let values: Vec<f64> = (0..40).map(|i| (i as f64 * 0.9).sin()).collect();
        let mut model = ARIMA::new(0, 1, 0);
        model.fit(&series(values)).unwrap();
        let fit = model.fit.as_ref().unwrap();
        assert_eq!(model.psi_weights(fit, 4), vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn step_down_stationarity() {
        assert!(is_stationary_ar(&[]));
        assert!(is_stationary_ar(&[0.5]));
        assert!(is_stationary_ar(&[0.5, 0.3]));
        assert!(!is_stationary_ar(&[1.0]));
        // 1 - 0.9z - 0.5z^2 has a root inside the unit circle
        assert!(!is_stationary_ar(&[0.9, 0.5]));
    }

    #[test]
    fn stationary_input_check() {
        // Strong trend plus pseudo-random noise, left undifferenced
        let mut state = 17u64;
        let trend: Vec<f64> = (0..150)
            .map(|i| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let e = (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5;
                100.0 + 0.5 * i as f64 + e
            })
            .collect();
        let mut model = ARIMA::new(1, 0, 0).require_stationary_input(true);
        let err = model.fit(&series(trend)).unwrap_err();
        assert!(matches!(err, AnalysisError::NonStationary(_)));
    }

    #[test]
    fn convergence_failure_is_reported() {
        let values: Vec<f64> = (0..80)
            .map(|i| 10.0 + (i as f64 * 0.3).sin() + (i as f64 * 1.1).cos())
            .collect();
        let mut model = ARIMA::new(2, 0, 2).with_max_iterations(2);
        let err = model.fit(&series(values)).unwrap_err();
        assert_eq!(err, AnalysisError::Convergence { iterations: 2 });
        assert!(!model.is_fitted());
    }

    #[test]
    fn arima_insufficient_data() {
        let mut model = ARIMA::new(2, 1, 1);
        assert!(matches!(
            model.fit(&series(vec![1.0, 2.0, 3.0])),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn arima_requires_fit() {
        let model = ARIMA::new(1, 1, 1);
        assert!(matches!(model.predict(5), Err(AnalysisError::FitRequired)));
    }

    #[test]
    fn arima_zero_horizon() {
        let values: Vec<f64> = (0..30).map(|i| i as f64 + (i as f64).sin()).collect();
        let mut model = ARIMA::new(1, 1, 1);
        model.fit(&series(values)).unwrap();
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn information_criteria_are_finite() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect();
        let mut model = ARIMA::new(1, 0, 1);
        model.fit(&series(values)).unwrap();
        assert!(model.aic().unwrap().is_finite());
        assert!(model.bic().unwrap() > model.aic().unwrap());
    }

    #[test]
    fn conditioning_narrows_the_scored_window() {
        let values: Vec<f64> = (0..40).map(|i| 5.0 + (i as f64 * 1.7).sin()).collect();
        let mut model = ARIMA::new(0, 0, 0).with_conditioning(3);
        assert_eq!(model.required_observations(), 5);
        model.fit(&series(values.clone())).unwrap();

        let tail = &values[3..];
        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / tail.len() as f64;
        assert_relative_eq!(model.intercept().unwrap(), mean, epsilon = 1e-12);
        assert_relative_eq!(model.residual_variance().unwrap(), variance, epsilon = 1e-12);
        assert_relative_eq!(
            model.bic().unwrap() - model.aic().unwrap(),
            (37.0_f64).ln() - 2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn conditioning_raises_minimum_length() {
        let mut model = ARIMA::new(1, 0, 0).with_conditioning(6);
        let err = model.fit(&series(vec![1.0, 2.0, 1.5, 2.5, 1.0, 2.0, 1.8, 2.2])).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { needed: 9, got: 8 });
    }

    #[test]
    fn spec_display_and_params() {
        let spec = ARIMASpec::new(2, 1, 3);
        assert_eq!(spec.num_params(), 6);
        assert_eq!(spec.to_string(), "ARIMA(2,1,3)");
    }
}
