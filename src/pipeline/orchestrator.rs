//! Runs detection, diagnostics, event correlation, evaluation and
//! forecasting in order.

use super::config::{ArimaConfig, PipelineConfig};
use super::result::{AnalysisResult, StageStatus};
use crate::changepoint::{
    bayesian_change_point, bic_penalty, cusum_deviation, cusum_peak, ChangePointDetector,
};
use crate::core::ObservedSeries;
use crate::error::Result;
use crate::evaluation::{EvaluationHarness, ModelEvaluation};
use crate::events::{analyze_impacts, correlate, EventCatalog};
use crate::models::arima::{AutoARIMA, ARIMA};
use crate::models::lstm::LSTM;
use crate::models::BoxedForecaster;
use tracing::{info, warn};

/// Batch analysis of one price series.
///
/// Detection and correlation failures abort the run. Diagnostic and
/// forecaster failures are recorded as failed stages and never stop the
/// remaining stages.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The configured catalog file, or the built-in Brent events.
    pub fn load_catalog(&self) -> Result<EventCatalog> {
        match &self.config.events.catalog {
            Some(path) => EventCatalog::from_file(path),
            None => Ok(EventCatalog::brent_key_events()),
        }
    }

    /// Run every stage against the configured event catalog.
    pub fn run(&self, series: &ObservedSeries) -> Result<AnalysisResult> {
        let catalog = self.load_catalog()?;
        self.run_with_catalog(series, &catalog)
    }

    /// Run every stage against `catalog`.
    pub fn run_with_catalog(
        &self,
        series: &ObservedSeries,
        catalog: &EventCatalog,
    ) -> Result<AnalysisResult> {
        let mut result = AnalysisResult::default();
        info!(observations = series.len(), events = catalog.len(), "pipeline started");

        let mut detector_config = self.config.detector.clone();
        if self.config.bic_penalty {
            detector_config.penalty = bic_penalty(series.values(), detector_config.cost_fn);
        }
        let points = ChangePointDetector::new(detector_config)?.detect(series)?;
        info!(change_points = points.len(), "detection finished");
        result.record("detection", StageStatus::Completed);

        self.run_diagnostics(series, &mut result);

        result.change_points = correlate(&points, catalog.events(), self.config.events.window_days);
        let matched = result.change_points.iter().filter(|cp| cp.is_matched()).count();
        info!(matched, "correlation finished");
        result.record("correlation", StageStatus::Completed);

        if self.config.events.analyze_impacts {
            result.impacts = analyze_impacts(series, catalog.events(), &self.config.events.impact)?;
            info!(impacts = result.impacts.len(), "impact analysis finished");
            result.record("impact_analysis", StageStatus::Completed);
        } else {
            result.record("impact_analysis", StageStatus::Skipped);
        }

        let mut models = self.build_forecasters();
        if models.is_empty() {
            result.record("evaluation", StageStatus::Skipped);
            result.record("forecast", StageStatus::Skipped);
            return Ok(result);
        }

        let harness = EvaluationHarness::new(self.config.evaluation.test_horizon);
        let evaluations = match harness.evaluate(series, &mut models) {
            Ok(evaluations) => {
                result.record("evaluation", StageStatus::Completed);
                evaluations
            }
            Err(e) => {
                warn!(error = %e, "evaluation split failed, no forecasts produced");
                result.record(
                    "evaluation",
                    StageStatus::Failed {
                        reason: e.to_string(),
                    },
                );
                return Ok(result);
            }
        };

        let horizon = self.config.evaluation.forecast_horizon;
        for (model, ModelEvaluation { model_name, outcome }) in models.iter_mut().zip(evaluations) {
            let report = match outcome {
                Ok(report) => report,
                Err(e) => {
                    result.record(
                        format!("evaluation:{model_name}"),
                        StageStatus::Failed {
                            reason: e.to_string(),
                        },
                    );
                    result.record(format!("forecast:{model_name}"), StageStatus::Skipped);
                    continue;
                }
            };
            info!(model = %model_name, rmse = report.rmse, mae = report.mae, "model evaluated");
            result.record(format!("evaluation:{model_name}"), StageStatus::Completed);
            result.evaluation.insert(model_name.clone(), report);

            let forecast = model
                .fit(series)
                .and_then(|()| model.predict(horizon))
                .and_then(|f| f.with_dates(series.future_dates(horizon)));
            match forecast {
                Ok(forecast) => {
                    info!(model = %model_name, horizon, "forecast produced");
                    result.record(format!("forecast:{model_name}"), StageStatus::Completed);
                    result.forecasts.insert(model_name, forecast);
                }
                Err(e) => {
                    warn!(model = %model_name, error = %e, "refit on full series failed");
                    result.record(
                        format!("forecast:{model_name}"),
                        StageStatus::Failed {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        info!(failed = result.failed_stages().count(), "pipeline finished");
        Ok(result)
    }

    /// CUSUM and Bayesian single-switch summaries.
    fn run_diagnostics(&self, series: &ObservedSeries, result: &mut AnalysisResult) {
        let diagnostics = self.config.diagnostics;

        if diagnostics.cusum {
            result.cusum_path = cusum_deviation(series.values());
            result.cusum_peak = cusum_peak(series);
            if let Some(peak) = &result.cusum_peak {
                info!(date = %peak.timestamp, value = peak.value, "CUSUM peak");
            }
            result.record("cusum", StageStatus::Completed);
        } else {
            result.record("cusum", StageStatus::Skipped);
        }

        if !diagnostics.bayesian {
            result.record("bayesian", StageStatus::Skipped);
            return;
        }
        match bayesian_change_point(series, self.config.detector.min_segment_length) {
            Ok(switch) => {
                info!(
                    date = %switch.timestamp,
                    probability = switch.map_probability,
                    "Bayesian switch point"
                );
                result.bayesian = Some(switch);
                result.record("bayesian", StageStatus::Completed);
            }
            Err(e) => {
                warn!(error = %e, "Bayesian switch point skipped");
                result.record(
                    "bayesian",
                    StageStatus::Failed {
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    /// Fresh, unfitted forecasters in the configured order.
    pub fn build_forecasters(&self) -> Vec<BoxedForecaster> {
        let mut models: Vec<BoxedForecaster> = Vec::new();
        if self.config.models.arima {
            match &self.config.arima {
                ArimaConfig::Fixed(fixed) => models.push(Box::new(
                    ARIMA::from_spec(fixed.spec())
                        .require_stationary_input(fixed.require_stationary_input),
                )),
                ArimaConfig::Auto(auto) => {
                    models.push(Box::new(AutoARIMA::with_config(auto.clone())))
                }
            }
        }
        if self.config.models.lstm {
            models.push(Box::new(LSTM::new(self.config.lstm.clone())));
        }
        models
    }
}
