//! # brent-analytics
//!
//! Structural-break and forecasting analysis of Brent crude oil prices.
//!
//! - [`changepoint`]: PELT and binary segmentation change point search,
//!   plus CUSUM and a Bayesian single switch point
//! - [`events`]: correlation of change points with historical events and
//!   price impact around each event
//! - [`models`]: ARIMA (fixed or automatic order) and LSTM forecasters
//! - [`evaluation`]: hold-out scoring with MAE, RMSE and MAPE
//! - [`pipeline`]: the whole analysis as one batch run
//!
//! # Example
//!
//! ```
//! use brent_analytics::prelude::*;
//! use chrono::NaiveDate;
//!
//! let mut values = vec![50.0; 60];
//! values.extend(vec![70.0; 40]);
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let series = ObservedSeries::from_values(start, values, Cadence::Daily).unwrap();
//!
//! let detector = ChangePointDetector::new(DetectorConfig::default().penalty(100.0)).unwrap();
//! let points = detector.detect(&series).unwrap();
//! assert_eq!(points[0].index, 60);
//!
//! let mut model = ARIMA::new(0, 1, 0);
//! model.fit(&series).unwrap();
//! let forecast = model.predict(5).unwrap();
//! assert_eq!(forecast.horizon, 5);
//! ```

#![allow(clippy::upper_case_acronyms)]

pub mod changepoint;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{AnalysisError, Result};

pub mod prelude {
    pub use crate::changepoint::{ChangePoint, ChangePointDetector, DetectionMethod, DetectorConfig};
    pub use crate::core::{Cadence, ForecastResult, ObservedSeries};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::evaluation::{EvaluationHarness, EvaluationReport};
    pub use crate::events::{correlate, CorrelatedChangePoint, EventAnnotation, EventCatalog};
    pub use crate::models::{AutoARIMA, Forecaster, ARIMA, LSTM};
    pub use crate::pipeline::{AnalysisResult, Pipeline, PipelineConfig};
}
