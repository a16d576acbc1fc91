//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - ARIMA models with a fixed (p, d, q) order, fitted by CSS
//! - lazy forecasts via [`ArimaForecastIter`] with psi-weight intervals
//! - AutoARIMA for automatic order selection

mod auto_arima;
mod diff;
mod model;

pub use auto_arima::{AutoARIMA, AutoARIMAConfig, InformationCriterion};
pub use diff::{difference, integrate, integrate_step, integration_anchors};
pub use model::{is_stationary_ar, ARIMASpec, ArimaForecastIter, ARIMA};
