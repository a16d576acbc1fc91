//! Changepoint detection algorithms.
//!
//! Provides methods to detect structural changes in a price series.
//!
//! # Available Algorithms
//!
//! - **PELT**: Pruned Exact Linear Time - exact penalized search
//! - **Binary segmentation**: greedy recursive splitting
//! - **CUSUM**: cumulative deviation path and its peak
//! - **Bayesian**: posterior over a single switch location
//!
//! # Cost Functions
//!
//! - **L2**: Standard mean-based (default)
//! - **Normal**: Log-likelihood for variance changes
//! - **MeanVariance**: Joint mean and variance changes
//!
//! # Example
//!
//! ```
//! use brent_analytics::changepoint::{ChangePointDetector, DetectorConfig};
//! use brent_analytics::core::{Cadence, ObservedSeries};
//! use chrono::NaiveDate;
//!
//! let mut values = vec![50.0; 50];
//! values.extend(vec![70.0; 50]);
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let series = ObservedSeries::from_values(start, values, Cadence::Daily).unwrap();
//!
//! let detector = ChangePointDetector::new(DetectorConfig::default().penalty(5.0)).unwrap();
//! let change_points = detector.detect(&series).unwrap();
//!
//! assert_eq!(change_points.len(), 1);
//! assert_eq!(change_points[0].index, 50);
//! ```

pub mod bayes;
pub mod binseg;
pub mod cost;
pub mod cusum;
pub mod detector;
pub mod pelt;

pub use bayes::{bayesian_change_point, BayesianChangePoint};
pub use binseg::binary_segmentation;
pub use cost::{
    l2_cost, mean_variance_cost, normal_cost, segment_cost, total_cost, CostFunction, PrefixSums,
};
pub use cusum::{cusum_deviation, cusum_peak, CusumPeak};
pub use detector::{bic_penalty, ChangePoint, ChangePointDetector, DetectionMethod, DetectorConfig};
pub use pelt::{pelt, prune_to_max};
