//! Drives the Katyusha optimizer through its epoch protocol.
//!
//! The [`KatyushaTrainer`](training::KatyushaTrainer) owns the live model parameters and
//! sequences the full batch and minibatch gradient evaluations of an
//! [`Objective`](arch::Objective) around the optimizer's calls.

pub mod arch;
pub mod dataset;
pub mod error;
pub mod specs;
pub mod training;

pub use error::{Result, TrainErr};
