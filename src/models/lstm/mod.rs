//! Recurrent neural forecaster.
//!
//! [`LSTM`] wraps an [`LstmNetwork`] with min-max normalization, sliding
//! window training and autoregressive prediction.

mod model;
mod network;

pub use model::{LstmConfig, LSTM};
pub use network::{ForwardCache, Gradients, LstmNetwork};
