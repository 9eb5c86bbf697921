//! Data sources: synthetic samples drawn from a known model.

pub mod sample;

pub use sample::*;
