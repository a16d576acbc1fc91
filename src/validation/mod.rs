//! Stationarity diagnostics.
//!
//! # Example
//!
//! ```
//! use brent_analytics::validation::{adf_test, differencing_order};
//!
//! let trend: Vec<f64> = (0..60).map(|i| 40.0 + 0.5 * i as f64).collect();
//! let adf = adf_test(&trend, None);
//! println!("ADF statistic: {}", adf.statistic);
//! assert_eq!(differencing_order(&[42.0; 30], 2), 0);
//! ```

pub mod stationarity;

pub use stationarity::{adf_test, differencing_order, CriticalValues, StationarityResult};
