//! Model implementations.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic; `FittedModel` pairs a kind with its solved coefficients.

pub mod fitted;
pub(crate) mod model;

pub use fitted::*;
pub(crate) use model::{fill_design_row, predict};
