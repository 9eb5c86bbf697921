//! The result of a successful fit: a model kind plus its coefficients.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::ModelKind;
use crate::error::FitError;
use crate::models::predict;

/// An immutable fitted model.
///
/// The coefficient count always equals `kind.param_count()`; the constructor
/// rejects anything else, so evaluation never hits an arity mismatch.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FittedModelRecord")]
pub struct FittedModel {
    kind: ModelKind,
    coefficients: Vec<f64>,
}

/// Unchecked wire shape of `FittedModel`.
#[derive(Deserialize)]
struct FittedModelRecord {
    kind: ModelKind,
    coefficients: Vec<f64>,
}

impl TryFrom<FittedModelRecord> for FittedModel {
    type Error = FitError;

    fn try_from(record: FittedModelRecord) -> Result<Self, Self::Error> {
        FittedModel::new(record.kind, record.coefficients)
    }
}

impl FittedModel {
    pub fn new(kind: ModelKind, coefficients: Vec<f64>) -> Result<Self, FitError> {
        if coefficients.len() != kind.param_count() {
            return Err(FitError::Arity {
                expected: kind.param_count(),
                got: coefficients.len(),
            });
        }
        Ok(Self { kind, coefficients })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.kind.index()
    }

    /// Coefficients in `ModelKind::param_names` order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Look up a coefficient by its name (`"a"`..`"f"`).
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.kind
            .param_names()
            .iter()
            .position(|n| *n == name)
            .map(|i| self.coefficients[i])
    }

    /// `(name, value)` pairs in storage order.
    pub fn named_coefficients(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.kind
            .param_names()
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
    }

    pub fn predict(&self, x1: f64, x2: f64) -> f64 {
        predict(self.kind, x1, x2, &self.coefficients)
    }

    /// Evaluate at a point with at least two components; extra components are ignored.
    pub fn evaluate(&self, point: &[f64]) -> Result<f64, FitError> {
        match point {
            [x1, x2, ..] => Ok(self.predict(*x1, *x2)),
            _ => Err(FitError::Arity {
                expected: 2,
                got: point.len(),
            }),
        }
    }

    /// Evaluate many `(x1, x2)` points in parallel, preserving order.
    pub fn evaluate_many(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points
            .par_iter()
            .map(|&(x1, x2)| self.predict(x1, x2))
            .collect()
    }
}
