//! Numerical helpers shared by the models and tests.

pub mod ols;
pub mod optimization;

pub use ols::{ols_fit, OLSResult};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
