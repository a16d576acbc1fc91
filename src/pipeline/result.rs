//! Aggregated output of one pipeline run.

use crate::changepoint::{BayesianChangePoint, CusumPeak};
use crate::core::ForecastResult;
use crate::error::Result;
use crate::evaluation::EvaluationReport;
use crate::events::{CorrelatedChangePoint, EventImpact};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Failed { reason: String },
    Skipped,
}

impl StageStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, StageStatus::Completed)
    }
}

/// A named stage and how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: String,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Everything the pipeline produced, keyed by model name where relevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub change_points: Vec<CorrelatedChangePoint>,
    /// CUSUM of deviations from the series mean; empty when not run.
    pub cusum_path: Vec<f64>,
    pub cusum_peak: Option<CusumPeak>,
    pub bayesian: Option<BayesianChangePoint>,
    pub impacts: Vec<EventImpact>,
    pub forecasts: BTreeMap<String, ForecastResult>,
    pub evaluation: BTreeMap<String, EvaluationReport>,
    /// Stages in execution order.
    pub stages: Vec<StageRecord>,
}

impl AnalysisResult {
    pub(crate) fn record(&mut self, stage: impl Into<String>, status: StageStatus) {
        self.stages.push(StageRecord {
            stage: stage.into(),
            status,
        });
    }

    /// Status of the named stage.
    pub fn stage(&self, name: &str) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|record| record.stage == name)
            .map(|record| &record.status)
    }

    pub fn failed_stages(&self) -> impl Iterator<Item = &StageRecord> {
        self.stages
            .iter()
            .filter(|record| matches!(record.status, StageStatus::Failed { .. }))
    }

    /// Evaluated model with the lowest RMSE.
    pub fn best_model(&self) -> Option<&EvaluationReport> {
        self.evaluation
            .values()
            .filter(|report| report.rmse.is_finite())
            .min_by(|a, b| a.rmse.total_cmp(&b.rmse))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
