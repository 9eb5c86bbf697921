//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the model registry (`ModelKind`)
//! - training data (`Observations`)
//! - solver starting points (`InitialGuess`)

pub mod types;

pub use types::*;
