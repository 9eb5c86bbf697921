//! Model evaluation for the six registered forms.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given `(x1, x2)` (the Jacobian row, since every
//!   form is linear in its coefficients)
//! - predict `y(x1, x2)` given coefficients
//!
//! Both follow the coefficient order of `ModelKind::param_names`, intercept last.

use crate::domain::ModelKind;

/// Fill a design row for the given model kind.
///
/// Entry `j` is `∂f/∂θ_j` at `(x1, x2)`.
///
/// # Panics
/// Panics if `out` does not have length `model.param_count()`.
pub(crate) fn fill_design_row(model: ModelKind, x1: f64, x2: f64, out: &mut [f64]) {
    match model {
        ModelKind::LinearX1 => {
            out[0] = x1;
            out[1] = 1.0;
        }
        ModelKind::LinearX2 => {
            out[0] = x2;
            out[1] = 1.0;
        }
        ModelKind::QuadraticX1 => {
            out[0] = x1;
            out[1] = x1 * x1;
            out[2] = 1.0;
        }
        ModelKind::QuadraticX2 => {
            out[0] = x2;
            out[1] = x2 * x2;
            out[2] = 1.0;
        }
        ModelKind::Plane => {
            out[0] = x1;
            out[1] = x2;
            out[2] = 1.0;
        }
        ModelKind::FullQuadratic => {
            out[0] = x1;
            out[1] = x2;
            out[2] = x1 * x1;
            out[3] = x2 * x2;
            out[4] = x1 * x2;
            out[5] = 1.0;
        }
    }
}

/// Predict `y(x1, x2)` for the given model kind.
///
/// # Panics
/// Panics if `coefs` is shorter than `model.param_count()`.
pub(crate) fn predict(model: ModelKind, x1: f64, x2: f64, coefs: &[f64]) -> f64 {
    match model {
        ModelKind::LinearX1 => {
            let (a, f) = (coefs[0], coefs[1]);
            a * x1 + f
        }
        ModelKind::LinearX2 => {
            let (b, f) = (coefs[0], coefs[1]);
            b * x2 + f
        }
        ModelKind::QuadraticX1 => {
            let (a, c, f) = (coefs[0], coefs[1], coefs[2]);
            a * x1 + c * x1 * x1 + f
        }
        ModelKind::QuadraticX2 => {
            let (b, d, f) = (coefs[0], coefs[1], coefs[2]);
            b * x2 + d * x2 * x2 + f
        }
        ModelKind::Plane => {
            let (a, b, f) = (coefs[0], coefs[1], coefs[2]);
            a * x1 + b * x2 + f
        }
        ModelKind::FullQuadratic => {
            let (a, b, c, d, e, f) = (coefs[0], coefs[1], coefs[2], coefs[3], coefs[4], coefs[5]);
            a * x1 + b * x2 + c * x1 * x1 + d * x2 * x2 + e * x1 * x2 + f
        }
    }
}
