//! Stateful fit-then-evaluate workflow.
//!
//! `FitSession` holds at most one fit. It starts unfitted; every successful
//! `fit` replaces the held model, and a failed `fit` leaves it untouched.
//! Mutation needs `&mut self`, so a reader can never observe a model index
//! paired with another model's coefficients.

use log::warn;

use crate::error::FitError;
use crate::fit::fitter::{FitOptions, FitOutcome, fit_with_options};
use crate::models::FittedModel;

#[derive(Debug, Clone, Default)]
pub struct FitSession {
    options: FitOptions,
    current: Option<FitOutcome>,
}

impl FitSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FitOptions) -> Self {
        Self {
            options,
            current: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.current.is_some()
    }

    pub fn model(&self) -> Option<&FittedModel> {
        self.current.as_ref().map(|outcome| &outcome.model)
    }

    /// Fit the model at `index` and make it the session's current model.
    pub fn fit(&mut self, index: usize, x1: &[f64], x2: &[f64], y: &[f64]) -> Result<&FitOutcome, FitError> {
        match fit_with_options(index, x1, x2, y, &self.options) {
            Ok(outcome) => Ok(&*self.current.insert(outcome)),
            Err(e) => {
                warn!("session: fit of model {index} failed, keeping previous state: {e}");
                Err(e)
            }
        }
    }

    /// Evaluate the current model at `point` (first two components used).
    pub fn evaluate(&self, point: &[f64]) -> Result<f64, FitError> {
        self.model().ok_or(FitError::Uninitialized)?.evaluate(point)
    }
}
