//! Input/output helpers.
//!
//! - CSV ingest of observations and evaluation points (`ingest`)
//! - CSV writers for predictions and samples (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
