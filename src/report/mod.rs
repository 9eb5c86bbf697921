//! Reporting: terminal tables and the `--json` document.

use serde::Serialize;

use crate::fit::FitOutcome;

pub mod format;

pub use format::*;

/// One evaluated point.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub x1: f64,
    pub x2: f64,
    pub y_fit: f64,
}

/// Everything `sfit fit --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct FitReportJson<'a> {
    pub model_index: usize,
    pub model_name: &'static str,
    pub formula: &'static str,
    pub param_names: &'static [&'static str],
    #[serde(flatten)]
    pub outcome: &'a FitOutcome,
    pub predictions: Vec<Prediction>,
}

impl<'a> FitReportJson<'a> {
    pub fn new(outcome: &'a FitOutcome, points: &[(f64, f64)], y_fit: &[f64]) -> Self {
        let kind = outcome.model.kind();
        Self {
            model_index: kind.index(),
            model_name: kind.name(),
            formula: kind.formula(),
            param_names: kind.param_names(),
            outcome,
            predictions: points
                .iter()
                .zip(y_fit)
                .map(|(&(x1, x2), &y_fit)| Prediction { x1, x2, y_fit })
                .collect(),
        }
    }
}
