//! Error types.
//!
//! - `FitError`: library-level failures from fitting and evaluation.
//! - `AppError`: what the `sfit` binary reports, carrying a process exit code.

use thiserror::Error;

/// Failures raised by the fit / evaluate core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Model index outside the registry.
    #[error("Invalid model index {index}: expected 0..={max}")]
    InvalidModelIndex { index: usize, max: usize },

    /// Observation vectors of unequal length.
    #[error("Observation length mismatch: x1={x1}, x2={x2}, y={y}")]
    LengthMismatch { x1: usize, x2: usize, y: usize },

    /// The least-squares solver could not produce a solution.
    #[error("Fit did not converge: {reason}")]
    Convergence { reason: String },

    /// Coefficient or point length inconsistent with the model.
    #[error("Arity mismatch: expected {expected} values, got {got}")]
    Arity { expected: usize, got: usize },

    /// Evaluate called before any successful fit.
    #[error("No model has been fitted yet")]
    Uninitialized,
}

impl FitError {
    pub(crate) fn convergence(reason: impl Into<String>) -> Self {
        FitError::Convergence {
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::Convergence { .. } => 4,
            FitError::InvalidModelIndex { .. }
            | FitError::LengthMismatch { .. }
            | FitError::Arity { .. }
            | FitError::Uninitialized => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
