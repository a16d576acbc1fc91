//! Forecasting models.
//!
//! Both forecasters implement [`Forecaster`] and are fitted and scored
//! the same way by the evaluation harness.

mod traits;

pub mod arima;
pub mod lstm;

pub use arima::{AutoARIMA, ARIMA};
pub use lstm::LSTM;
pub use traits::{BoxedForecaster, Forecaster};
