//! Automatic ARIMA order selection.

use crate::core::{ForecastResult, ObservedSeries};
use crate::error::{AnalysisError, Result};
use crate::models::arima::model::{ARIMASpec, ARIMA};
use crate::models::Forecaster;
use crate::validation::stationarity::differencing_order;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Information criterion minimized by the order search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationCriterion {
    #[default]
    Aic,
    Bic,
}

/// Configuration for AutoARIMA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoARIMAConfig {
    /// Maximum AR order to consider.
    pub max_p: usize,
    /// Maximum differencing order.
    pub max_d: usize,
    /// Maximum MA order to consider.
    pub max_q: usize,
    pub criterion: InformationCriterion,
    /// Optimizer budget for each candidate.
    pub max_iterations: usize,
}

impl Default for AutoARIMAConfig {
    fn default() -> Self {
        Self {
            max_p: 3,
            max_d: 2,
            max_q: 3,
            criterion: InformationCriterion::Aic,
            max_iterations: 2000,
        }
    }
}

impl AutoARIMAConfig {
    /// Set maximum orders.
    pub fn with_max_orders(mut self, max_p: usize, max_d: usize, max_q: usize) -> Self {
        self.max_p = max_p;
        self.max_d = max_d;
        self.max_q = max_q;
        self
    }

    pub fn with_criterion(mut self, criterion: InformationCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(AnalysisError::Configuration(
                "max_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Automatic ARIMA model selection.
///
/// The differencing order is the smallest `d <= max_d` at which the ADF
/// test rejects a unit root. All `(p, q)` pairs up to the configured
/// maxima are then fitted and the one with the lowest information
/// criterion is kept; ties go to the model with fewer parameters.
/// Every candidate conditions on the first `max(max_p, max_q)`
/// differenced values, so all criteria are computed over the same
/// observations. Candidates that fail to fit are skipped.
#[derive(Debug, Clone, Default)]
pub struct AutoARIMA {
    config: AutoARIMAConfig,
    selected: Option<ARIMA>,
    /// All successfully fitted orders and their scores, best first.
    model_scores: Vec<(ARIMASpec, f64)>,
}

impl AutoARIMA {
    /// Create a new AutoARIMA with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create AutoARIMA with custom configuration.
    pub fn with_config(config: AutoARIMAConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Selected `(p, d, q)`, once fitted.
    pub fn selected_order(&self) -> Option<ARIMASpec> {
        self.selected.as_ref().map(ARIMA::spec)
    }

    /// The fitted model behind the selection.
    pub fn selected_model(&self) -> Option<&ARIMA> {
        self.selected.as_ref()
    }

    pub fn model_scores(&self) -> &[(ARIMASpec, f64)] {
        &self.model_scores
    }

    fn criterion(&self, model: &ARIMA) -> Option<f64> {
        match self.config.criterion {
            InformationCriterion::Aic => model.aic(),
            InformationCriterion::Bic => model.bic(),
        }
    }
}

impl Forecaster for AutoARIMA {
    fn fit(&mut self, series: &ObservedSeries) -> Result<()> {
        self.config.validate()?;
        self.selected = None;
        self.model_scores.clear();

        let values = series.values();
        let d = differencing_order(values, self.config.max_d);
        debug!(d, "differencing order selected");

        let conditioning = self.config.max_p.max(self.config.max_q);
        let mut best: Option<(ARIMA, f64)> = None;
        let mut last_error = None;

        for p in 0..=self.config.max_p {
            for q in 0..=self.config.max_q {
                let spec = ARIMASpec::new(p, d, q);
                let mut model = ARIMA::from_spec(spec)
                    .with_max_iterations(self.config.max_iterations)
                    .with_conditioning(conditioning);
                if values.len() < model.required_observations() {
                    continue;
                }
                if let Err(e) = model.fit(series) {
                    debug!(order = %spec, error = %e, "candidate skipped");
                    last_error = Some(e);
                    continue;
                }
                let Some(score) = self.criterion(&model).filter(|s| s.is_finite()) else {
                    continue;
                };
                debug!(order = %spec, score, "candidate fitted");
                self.model_scores.push((spec, score));

                let better = match &best {
                    None => true,
                    Some((current, best_score)) => {
                        score < *best_score
                            || (score == *best_score
                                && spec.num_params() < current.spec().num_params())
                    }
                };
                if better {
                    best = Some((model, score));
                }
            }
        }

        self.model_scores.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.num_params().cmp(&b.0.num_params()))
        });

        match best {
            Some((model, _)) => {
                self.selected = Some(model);
                Ok(())
            }
            None => Err(last_error.unwrap_or(AnalysisError::InsufficientData {
                needed: ARIMA::new(0, d, 0)
                    .with_conditioning(conditioning)
                    .required_observations(),
                got: values.len(),
            })),
        }
    }

    fn predict(&self, horizon: usize) -> Result<ForecastResult> {
        let model = self.selected.as_ref().ok_or(AnalysisError::FitRequired)?;
        let mut forecast = model.predict(horizon)?;
        forecast.model_name = self.name().to_string();
        Ok(forecast)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.selected.as_ref()?.fitted_values()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.selected.as_ref()?.residuals()
    }

    fn name(&self) -> &str {
        "AutoARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cadence;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> ObservedSeries {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        ObservedSeries::from_values(start, values, Cadence::Daily).unwrap()
    }

    #[test]
    fn trend_selects_one_difference() {
        let values: Vec<f64> = (0..80)
            .map(|i| 20.0 + 1.5 * i as f64 + 0.01 * (i as f64 * 2.3).sin())
            .collect();
        let mut model =
            AutoARIMA::with_config(AutoARIMAConfig::default().with_max_orders(1, 2, 1));
        model.fit(&series(values)).unwrap();

        assert_eq!(model.selected_order().unwrap().d, 1);
        assert!(!model.model_scores().is_empty());
        assert_eq!(model.predict(4).unwrap().horizon, 4);
    }

    #[test]
    fn scores_are_sorted() {
        let values: Vec<f64> = (0..80)
            .map(|i| 50.0 + 3.0 * (i as f64 * 0.5).sin() + (i as f64 * 1.9).cos())
            .collect();
        let mut model =
            AutoARIMA::with_config(AutoARIMAConfig::default().with_max_orders(2, 1, 1));
        model.fit(&series(values)).unwrap();

        let scores = model.model_scores();
        for w in scores.windows(2) {
            assert!(w[0].1 <= w[1].1);
        }
        assert_eq!(model.selected_order(), Some(scores[0].0));
    }

    #[test]
    fn constant_series_prefers_smallest_model() {
        let mut model =
            AutoARIMA::with_config(AutoARIMAConfig::default().with_max_orders(1, 1, 1));
        model.fit(&series(vec![42.0; 40])).unwrap();
        let order = model.selected_order().unwrap();
        assert_eq!(order.d, 0);
        let forecast = model.predict(3).unwrap();
        assert_eq!(forecast.model_name, "AutoARIMA");
        for p in forecast.predictions {
            assert!((p - 42.0).abs() < 1e-6);
        }
    }

    #[test]
    fn selected_order_does_not_depend_on_price_units() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(17);
        let noise: Vec<f64> = (0..400).map(|_| rng.gen_range(-1.0..1.0)).collect();

        let orders: Vec<ARIMASpec> = [0.01, 1.0, 10.0]
            .iter()
            .map(|scale| {
                let values = noise.iter().map(|e| 100.0 + scale * e).collect();
                let mut model =
                    AutoARIMA::with_config(AutoARIMAConfig::default().with_max_orders(2, 0, 2));
                model.fit(&series(values)).unwrap();
                model.selected_order().unwrap()
            })
            .collect();

        assert_eq!(orders[0], orders[1]);
        assert_eq!(orders[1], orders[2]);
    }

    #[test]
    fn too_short_series_fails() {
        let mut model = AutoARIMA::new();
        assert!(model.fit(&series(vec![1.0, 2.0, 1.5])).is_err());
    }

    #[test]
    fn requires_fit() {
        let model = AutoARIMA::new();
        assert!(matches!(model.predict(3), Err(AnalysisError::FitRequired)));
    }
}
