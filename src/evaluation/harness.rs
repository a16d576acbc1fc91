//! Hold-out evaluation of forecasters on a shared test window.

use super::metrics::calculate_metrics;
use crate::core::{ForecastResult, ObservedSeries};
use crate::error::Result;
use crate::models::Forecaster;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

/// Accuracy of one model on the held-out window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub model_name: String,
    pub mae: f64,
    pub rmse: f64,
    /// `None` when a held-out value is zero.
    pub mape: Option<f64>,
    pub smape: f64,
    pub mse: f64,
    /// Date of the first held-out observation.
    pub test_start: NaiveDate,
    /// The forecast that was scored, dated over the test window.
    pub forecast: ForecastResult,
}

/// Outcome for one model. Failures never abort the other models.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEvaluation {
    pub model_name: String,
    pub outcome: Result<EvaluationReport>,
}

/// Splits a series into train and test and scores forecasters on the test
/// part.
///
/// The last `test_horizon` observations are held out. Each model is fitted
/// on the training prefix only, so nothing from the test window can leak
/// into its parameters, and every model is scored on the identical slice.
///
/// # Example
/// ```
/// use brent_analytics::core::{Cadence, ObservedSeries};
/// use brent_analytics::evaluation::EvaluationHarness;
/// use brent_analytics::models::{BoxedForecaster, ARIMA};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let series = ObservedSeries::from_values(start, vec![42.0; 60], Cadence::Daily).unwrap();
///
/// let mut models: Vec<BoxedForecaster> = vec![Box::new(ARIMA::new(1, 0, 0))];
/// let results = EvaluationHarness::new(10).evaluate(&series, &mut models).unwrap();
/// let report = results[0].outcome.as_ref().unwrap();
/// assert!(report.mae < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationHarness {
    test_horizon: usize,
}

impl EvaluationHarness {
    pub fn new(test_horizon: usize) -> Self {
        Self { test_horizon }
    }

    pub fn test_horizon(&self) -> usize {
        self.test_horizon
    }

    /// `(train, test)` for this harness.
    ///
    /// Fails with `Configuration` when `test_horizon` is zero and with
    /// `InsufficientData` when it leaves no training data.
    pub fn split(&self, series: &ObservedSeries) -> Result<(ObservedSeries, ObservedSeries)> {
        series.split_holdout(self.test_horizon)
    }

    /// Fit `model` on `train` and score its forecast against `test`.
    pub fn evaluate_model(
        &self,
        model: &mut dyn Forecaster,
        train: &ObservedSeries,
        test: &ObservedSeries,
    ) -> Result<EvaluationReport> {
        model.fit(train)?;
        let forecast = model.predict(test.len())?;
        let metrics = calculate_metrics(test.values(), &forecast.predictions)?;
        let forecast = forecast.with_dates(test.dates().to_vec())?;

        Ok(EvaluationReport {
            model_name: model.name().to_string(),
            mae: metrics.mae,
            rmse: metrics.rmse,
            mape: metrics.mape,
            smape: metrics.smape,
            mse: metrics.mse,
            test_start: test.dates()[0],
            forecast,
        })
    }

    /// Evaluate every model on the same split.
    ///
    /// The outer `Result` fails only for an invalid split; per-model
    /// failures are carried in each [`ModelEvaluation`].
    pub fn evaluate(
        &self,
        series: &ObservedSeries,
        models: &mut [Box<dyn Forecaster>],
    ) -> Result<Vec<ModelEvaluation>> {
        let (train, test) = self.split(series)?;
        debug!(
            train = train.len(),
            test = test.len(),
            "evaluation split"
        );

        Ok(models
            .iter_mut()
            .map(|model| {
                let outcome = self.evaluate_model(model.as_mut(), &train, &test);
                if let Err(e) = &outcome {
                    warn!(model = model.name(), error = %e, "model evaluation failed");
                }
                ModelEvaluation {
                    model_name: model.name().to_string(),
                    outcome,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cadence;
    use crate::error::AnalysisError;
    use crate::models::{BoxedForecaster, ARIMA};
    use approx::assert_relative_eq;

    fn series(values: Vec<f64>) -> ObservedSeries {
        let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        ObservedSeries::from_values(start, values, Cadence::Daily).unwrap()
    }

    /// Predicts the mean of whatever it was fitted on.
    #[derive(Default)]
    struct MeanModel {
        mean: Option<f64>,
        seen: Vec<f64>,
    }

    impl Forecaster for MeanModel {
        fn fit(&mut self, series: &ObservedSeries) -> Result<()> {
            self.seen = series.values().to_vec();
            self.mean = Some(series.mean());
            Ok(())
        }

        fn predict(&self, horizon: usize) -> Result<ForecastResult> {
            let mean = self.mean.ok_or(AnalysisError::FitRequired)?;
            Ok(ForecastResult::new("Mean", vec![mean; horizon]))
        }

        fn fitted_values(&self) -> Option<&[f64]> {
            None
        }

        fn residuals(&self) -> Option<&[f64]> {
            None
        }

        fn name(&self) -> &str {
            "Mean"
        }
    }

    /// Always fails to fit.
    struct Broken;

    impl Forecaster for Broken {
        fn fit(&mut self, _series: &ObservedSeries) -> Result<()> {
            Err(AnalysisError::Convergence { iterations: 7 })
        }

        fn predict(&self, _horizon: usize) -> Result<ForecastResult> {
            Err(AnalysisError::FitRequired)
        }

        fn fitted_values(&self) -> Option<&[f64]> {
            None
        }

        fn residuals(&self) -> Option<&[f64]> {
            None
        }

        fn name(&self) -> &str {
            "Broken"
        }
    }

    #[test]
    fn scores_on_the_trailing_window() {
        let mut values = vec![10.0; 20];
        values.extend([12.0, 8.0, 14.0, 6.0]);
        let mut models: Vec<BoxedForecaster> = vec![Box::new(MeanModel::default())];
        let results = EvaluationHarness::new(4)
            .evaluate(&series(values), &mut models)
            .unwrap();

        let report = results[0].outcome.as_ref().unwrap();
        assert_relative_eq!(report.mae, 3.0, epsilon = 1e-12);
        assert_relative_eq!(report.rmse, (10.0f64).sqrt(), epsilon = 1e-12);
        assert_eq!(report.test_start, NaiveDate::from_ymd_opt(2022, 3, 21).unwrap());
        assert_eq!(report.forecast.dates.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn failure_is_isolated_per_model() {
        let mut models: Vec<BoxedForecaster> =
            vec![Box::new(Broken), Box::new(MeanModel::default())];
        let results = EvaluationHarness::new(5)
            .evaluate(&series(vec![3.0; 30]), &mut models)
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].outcome,
            Err(AnalysisError::Convergence { iterations: 7 })
        );
        assert!(results[1].outcome.is_ok());
    }

    #[test]
    fn training_never_sees_the_test_window() {
        let values: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let harness = EvaluationHarness::new(8);
        let (train, test) = harness.split(&series(values)).unwrap();

        let mut model = MeanModel::default();
        harness.evaluate_model(&mut model, &train, &test).unwrap();
        assert_eq!(model.seen.len(), 32);
        assert!(model.seen.iter().all(|v| *v < 32.0));
    }

    #[test]
    fn zero_in_test_window_leaves_mape_undefined() {
        let mut values = vec![1.0; 20];
        values.extend([0.0, 1.0, 1.0]);
        let mut models: Vec<BoxedForecaster> = vec![Box::new(MeanModel::default())];
        let results = EvaluationHarness::new(3)
            .evaluate(&series(values), &mut models)
            .unwrap();
        assert!(results[0].outcome.as_ref().unwrap().mape.is_none());
    }

    #[test]
    fn invalid_horizons() {
        let s = series(vec![1.0; 10]);
        let mut models: Vec<BoxedForecaster> = vec![Box::new(ARIMA::new(1, 0, 0))];
        assert!(matches!(
            EvaluationHarness::new(0).evaluate(&s, &mut models),
            Err(AnalysisError::Configuration(_))
        ));
        assert_eq!(
            EvaluationHarness::new(10).evaluate(&s, &mut models),
            Err(AnalysisError::InsufficientData { needed: 11, got: 10 })
        );
    }
}
