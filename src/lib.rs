//! `surface-fit` library crate.
//!
//! Fits one of six polynomial models in two predictors by Levenberg–Marquardt
//! least squares and evaluates the result.
//!
//! ```no_run
//! let x1 = [1.0, 2.0, 3.0];
//! let x2 = [0.0, 0.0, 0.0];
//! let y = [7.0, 9.0, 11.0];
//! let model = surface_fit::fit(0, &x1, &x2, &y)?;
//! let y_hat = model.evaluate(&[4.0, 0.0])?;
//! # Ok::<(), surface_fit::FitError>(())
//! ```
//!
//! The binary (`sfit`) is a thin wrapper around this library so that the core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{InitialGuess, ModelKind, Observations};
pub use error::{AppError, FitError};
pub use fit::{FitOptions, FitOutcome, FitSession, fit, fit_model, fit_with_options};
pub use math::LmConfig;
pub use models::FittedModel;
