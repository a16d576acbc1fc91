//! Forecaster trait defining the common interface for all models.

use crate::core::{ForecastResult, ObservedSeries};
use crate::error::Result;

/// Common interface for price forecasters.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
/// A fitted model only knows the series it was fitted on; predictions
/// start at the step after its last observation.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &ObservedSeries) -> Result<()>;

    /// Predict `horizon` steps ahead.
    fn predict(&self, horizon: usize) -> Result<ForecastResult>;

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use brent_analytics::models::{BoxedForecaster, Forecaster};
/// use brent_analytics::models::arima::ARIMA;
///
/// let model: BoxedForecaster = Box::new(ARIMA::new(1, 1, 0));
/// assert_eq!(model.name(), "ARIMA");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;
