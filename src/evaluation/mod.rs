//! Forecast accuracy metrics and hold-out evaluation.

pub mod harness;
pub mod metrics;

pub use harness::{EvaluationHarness, EvaluationReport, ModelEvaluation};
pub use metrics::{calculate_metrics, mae, mape, mse, rmse, smape, AccuracyMetrics};
