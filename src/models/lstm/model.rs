//! LSTM forecaster trained on sliding windows of a normalized series.

use super::network::LstmNetwork;
use crate::core::{ForecastResult, ObservedSeries};
use crate::error::{AnalysisError, Result};
use crate::models::Forecaster;
use crate::transform::{normalize, sliding_pairs, ScaleResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Training options for [`LSTM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LstmConfig {
    /// Number of past observations fed per prediction.
    pub window_size: usize,
    pub epochs: usize,
    pub hidden_units: usize,
    /// Seed for weight initialization and sample shuffling.
    pub seed: u64,
    pub learning_rate: f64,
    /// Maximum gradient norm per update.
    pub clip_norm: f64,
}

impl Default for LstmConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            epochs: 50,
            hidden_units: 16,
            seed: 42,
            learning_rate: 0.01,
            clip_norm: 1.0,
        }
    }
}

impl LstmConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("window_size", self.window_size),
            ("epochs", self.epochs),
            ("hidden_units", self.hidden_units),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(AnalysisError::Configuration(format!(
                    "{name} must be positive"
                )));
            }
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(AnalysisError::Configuration(
                "learning_rate must be positive and finite".to_string(),
            ));
        }
        if self.clip_norm.is_nan() || self.clip_norm <= 0.0 {
            return Err(AnalysisError::Configuration(
                "clip_norm must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct LstmFit {
    network: LstmNetwork,
    scaler: ScaleResult,
    /// Last `window_size` normalized observations.
    last_window: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    loss_history: Vec<f64>,
}

/// Recurrent forecaster: one LSTM layer and a linear head.
///
/// Training minimizes squared one-step error with per-sample gradient
/// descent, shuffling the samples every epoch. With a fixed seed the
/// whole fit is reproducible. Forecasts feed each prediction back as the
/// next input and carry no intervals.
#[derive(Debug, Clone, Default)]
pub struct LSTM {
    config: LstmConfig,
    fit: Option<LstmFit>,
}

impl LSTM {
    pub fn new(config: LstmConfig) -> Self {
        Self { config, fit: None }
    }

    pub fn config(&self) -> &LstmConfig {
        &self.config
    }

    /// Mean training loss per epoch (normalized scale).
    pub fn loss_history(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.loss_history.as_slice())
    }
}

impl Forecaster for LSTM {
    fn fit(&mut self, series: &ObservedSeries) -> Result<()> {
        self.config.validate()?;
        self.fit = None;

        let window = self.config.window_size;
        let values = series.values();
        if values.len() <= window {
            return Err(AnalysisError::InsufficientData {
                needed: window + 1,
                got: values.len(),
            });
        }

        let scaler = normalize(values);
        let pairs = sliding_pairs(&scaler.data, window);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut network = LstmNetwork::new(self.config.hidden_units, &mut rng);
        let mut order: Vec<usize> = (0..pairs.len()).collect();
        let mut loss_history = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            order.shuffle(&mut rng);
            let mut total = 0.0;
            for &idx in &order {
                let (inputs, target) = pairs[idx];
                let (y, cache) = network.forward(inputs);
                let err = y - target;
                total += err * err;

                let mut grads = network.backward(&cache, 2.0 * err);
                grads.clip(self.config.clip_norm);
                network.apply(&grads, self.config.learning_rate);
            }
            let loss = total / pairs.len() as f64;
            if !loss.is_finite() {
                return Err(AnalysisError::TrainingDiverged { epoch });
            }
            debug!(epoch, loss, "LSTM epoch");
            loss_history.push(loss);
        }

        let fitted: Vec<f64> = pairs
            .iter()
            .map(|(inputs, _)| scaler.inverse_value(network.predict(inputs)))
            .collect();
        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::TrainingDiverged {
                epoch: self.config.epochs,
            });
        }
        let residuals = values[window..]
            .iter()
            .zip(&fitted)
            .map(|(actual, pred)| actual - pred)
            .collect();

        self.fit = Some(LstmFit {
            last_window: scaler.data[scaler.data.len() - window..].to_vec(),
            network,
            scaler,
            fitted,
            residuals,
            loss_history,
        });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<ForecastResult> {
        let fit = self.fit.as_ref().ok_or(AnalysisError::FitRequired)?;
        let mut window = fit.last_window.clone();
        let mut predictions = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let next = fit.network.predict(&window);
            predictions.push(fit.scaler.inverse_value(next));
            window.remove(0);
            window.push(next);
        }
        Ok(ForecastResult::new(self.name(), predictions))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "LSTM"
    }
}
