//! Data transformations for model inputs.
//!
//! # Example
//!
//! ```
//! use brent_analytics::transform::{normalize, sliding_pairs};
//!
//! let prices = vec![70.0, 72.5, 71.0, 74.0, 76.5];
//! let scaled = normalize(&prices);
//! let pairs = sliding_pairs(&scaled.data, 3);
//! assert_eq!(pairs.len(), 2);
//! ```

pub mod scale;
pub mod window;

pub use scale::{normalize, ScaleResult};
pub use window::sliding_pairs;
