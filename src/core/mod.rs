//! Core data structures: the observed price series and forecast results.

mod forecast;
mod series;

pub use forecast::ForecastResult;
pub use series::{Cadence, ObservedSeries};
