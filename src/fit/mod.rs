//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - validate the model index and observations
//! - run Levenberg–Marquardt for the chosen model
//! - hand back an immutable `FittedModel` (or keep one in a `FitSession`)

pub mod fitter;
pub mod session;

pub use fitter::*;
pub use session::*;
