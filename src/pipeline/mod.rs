//! End-to-end analysis: change points, events, model evaluation and
//! forecasts in one [`AnalysisResult`].

pub mod config;
pub mod orchestrator;
pub mod result;

pub use config::{
    ArimaConfig, DiagnosticsConfig, EvaluationConfig, EventsConfig, FixedArimaConfig, ModelsConfig,
    PipelineConfig,
};
pub use orchestrator::Pipeline;
pub use result::{AnalysisResult, StageRecord, StageStatus};
