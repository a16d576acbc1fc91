//! Pipeline configuration, loadable from TOML.
//!
//! Every section is optional and falls back to its defaults:
//!
//! ```toml
//! cadence = { kind = "irregular", max_gap_days = 5 }
//! bic_penalty = true
//!
//! [detector]
//! min_segment_length = 60
//! max_change_points = 8
//! method = "binary_segmentation"
//!
//! [events]
//! window_days = 45
//! catalog = "events.toml"
//!
//! [events.impact]
//! t_test = "pooled"
//!
//! [diagnostics]
//! cusum = true
//! bayesian = false
//!
//! [arima]
//! mode = "fixed"
//! p = 1
//! d = 1
//! q = 1
//!
//! [lstm]
//! window_size = 20
//! epochs = 30
//!
//! [evaluation]
//! test_horizon = 60
//! forecast_horizon = 30
//! ```

use crate::changepoint::DetectorConfig;
use crate::core::Cadence;
use crate::error::{AnalysisError, Result};
use crate::events::ImpactConfig;
use crate::models::arima::{ARIMASpec, AutoARIMAConfig};
use crate::models::lstm::LstmConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for [`Pipeline`](super::Pipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cadence the input series is validated against.
    pub cadence: Cadence,
    /// Replace `detector.penalty` with a BIC penalty computed from the series.
    pub bic_penalty: bool,
    pub detector: DetectorConfig,
    pub events: EventsConfig,
    pub diagnostics: DiagnosticsConfig,
    pub models: ModelsConfig,
    pub arima: ArimaConfig,
    pub lstm: LstmConfig,
    pub evaluation: EvaluationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cadence: Cadence::Irregular { max_gap_days: 5 },
            bic_penalty: true,
            detector: DetectorConfig::default(),
            events: EventsConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            models: ModelsConfig::default(),
            arima: ArimaConfig::default(),
            lstm: LstmConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

/// Event correlation and impact settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Maximum distance in days between a change point and its event.
    pub window_days: u32,
    /// TOML event catalog; the built-in Brent catalog when absent.
    pub catalog: Option<PathBuf>,
    /// Run the around-event price analysis.
    pub analyze_impacts: bool,
    pub impact: ImpactConfig,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            catalog: None,
            analyze_impacts: true,
            impact: ImpactConfig::default(),
        }
    }
}

/// Single-shift diagnostics reported next to the detected change points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// CUSUM path of deviations from the mean and its peak.
    pub cusum: bool,
    /// Posterior over a single switch location.
    pub bayesian: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            cusum: true,
            bayesian: true,
        }
    }
}

/// Which forecasters take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub arima: bool,
    pub lstm: bool,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            arima: true,
            lstm: true,
        }
    }
}

/// ARIMA with a fixed order or with automatic order selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ArimaConfig {
    Fixed(FixedArimaConfig),
    Auto(AutoARIMAConfig),
}

impl Default for ArimaConfig {
    fn default() -> Self {
        ArimaConfig::Auto(AutoARIMAConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedArimaConfig {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    /// Reject inputs whose differenced series still has a unit root.
    #[serde(default)]
    pub require_stationary_input: bool,
}

impl FixedArimaConfig {
    pub fn spec(&self) -> ARIMASpec {
        ARIMASpec::new(self.p, self.d, self.q)
    }
}

/// Hold-out and forecast lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Observations held out for scoring.
    pub test_horizon: usize,
    /// Steps forecast past the end of the series.
    pub forecast_horizon: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_horizon: 30,
            forecast_horizon: 30,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.events.impact.validate()?;
        if let ArimaConfig::Auto(auto) = &self.arima {
            auto.validate()?;
        }
        self.lstm.validate()?;

        if self.evaluation.test_horizon == 0 {
            return Err(AnalysisError::Configuration(
                "test_horizon must be positive".to_string(),
            ));
        }
        if self.evaluation.forecast_horizon == 0 {
            return Err(AnalysisError::Configuration(
                "forecast_horizon must be positive".to_string(),
            ));
        }
        if let Cadence::Irregular { max_gap_days } = self.cadence {
            if max_gap_days < 1 {
                return Err(AnalysisError::Configuration(
                    "max_gap_days must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}
