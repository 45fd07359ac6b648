//! The Katyusha accelerated variance reduced stochastic optimizer.
//!
//! [`Katyusha`](optimization::Katyusha) runs the inner loop of the algorithm and
//! [`Snapshot`](optimization::Snapshot) tracks the point where the full batch gradient is
//! evaluated. Both work on [`ParamSet`](params::ParamSet)s, ordered groups of `ndarray` tensors
//! with optional gradients.

pub mod error;
pub mod optimization;
pub mod params;

pub use error::{OptErr, Result};
