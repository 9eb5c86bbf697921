//! Fitting routines for a single model kind.
//!
//! Given:
//! - predictors `x1_i`, `x2_i`
//! - observed values `y_i`
//! - a model kind and a starting guess
//!
//! we run Levenberg–Marquardt on `Σ (y_i − f(x1_i, x2_i; θ))²` and return an
//! immutable `FittedModel`.
//!
//! Failure modes surface as `FitError::Convergence`:
//! - fewer observations than coefficients
//! - a rank-deficient Jacobian at the solution
//! - non-finite residuals or an exhausted iteration budget

use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::domain::{InitialGuess, ModelKind, Observations};
use crate::error::FitError;
use crate::math::{LeastSquaresProblem, LmConfig, RANK_TOL, Termination, levenberg_marquardt, scaled_rank};
use crate::models::{FittedModel, fill_design_row, predict};

/// Options that affect how a model is calibrated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitOptions {
    pub initial_guess: InitialGuess,
    pub solver: LmConfig,
}

/// A fitted model plus solver diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitOutcome {
    pub model: FittedModel,
    pub iterations: usize,
    /// Residual sum of squares at the solution (logged, never reported).
    #[serde(skip)]
    pub sse: f64,
    pub termination: Termination,
}

/// Fit the model at registry `index` with default options.
pub fn fit(index: usize, x1: &[f64], x2: &[f64], y: &[f64]) -> Result<FittedModel, FitError> {
    fit_with_options(index, x1, x2, y, &FitOptions::default()).map(|outcome| outcome.model)
}

/// Fit the model at registry `index`.
///
/// The index is validated before anything else runs.
pub fn fit_with_options(
    index: usize,
    x1: &[f64],
    x2: &[f64],
    y: &[f64],
    opts: &FitOptions,
) -> Result<FitOutcome, FitError> {
    let kind = ModelKind::from_index(index)?;
    let obs = Observations::from_slices(x1, x2, y)?;
    fit_model(kind, &obs, opts)
}

/// Fit a single model kind to the observations.
pub fn fit_model(kind: ModelKind, obs: &Observations, opts: &FitOptions) -> Result<FitOutcome, FitError> {
    let n = obs.len();
    let p = kind.param_count();
    if n < p {
        return Err(FitError::convergence(format!(
            "underdetermined: {n} observations for {p} coefficients of model {}",
            kind.index()
        )));
    }

    let initial = opts.initial_guess.resolve(kind)?;
    debug!("fit: model={kind} n={n} initial={initial:?}");

    let problem = ModelProblem { kind, obs };
    let report = levenberg_marquardt(&problem, &initial, &opts.solver)?;

    // The solver can settle on one point of a flat valley; treat that as failure.
    // Columns are normalized first so predictor units do not affect the verdict.
    let mut jac = DMatrix::<f64>::zeros(n, p);
    problem.jacobian(&report.params, &mut jac);
    let rank = scaled_rank(&jac, RANK_TOL);
    if rank < p {
        return Err(FitError::convergence(format!(
            "singular Jacobian: rank {rank} < {p} coefficients of model {}",
            kind.index()
        )));
    }

    let model = FittedModel::new(kind, report.params)?;
    info!(
        "fit: model={kind} coefficients={:?} iterations={} sse={:e}",
        model.coefficients(),
        report.iterations,
        report.sse
    );

    Ok(FitOutcome {
        model,
        iterations: report.iterations,
        sse: report.sse,
        termination: report.termination,
    })
}

/// Observations viewed as a least-squares problem for one model kind.
struct ModelProblem<'a> {
    kind: ModelKind,
    obs: &'a Observations,
}

impl LeastSquaresProblem for ModelProblem<'_> {
    fn residual_count(&self) -> usize {
        self.obs.len()
    }

    fn param_count(&self) -> usize {
        self.kind.param_count()
    }

    fn residuals(&self, params: &[f64], out: &mut DVector<f64>) {
        for (i, (x1, x2, y)) in self.obs.rows().enumerate() {
            out[i] = y - predict(self.kind, x1, x2, params);
        }
    }

    // Every registered form is linear in θ, so the design row is the exact Jacobian.
    fn jacobian(&self, _params: &[f64], out: &mut DMatrix<f64>) {
        let mut row = vec![0.0; self.kind.param_count()];
        for (i, (x1, x2, _)) in self.obs.rows().enumerate() {
            fill_design_row(self.kind, x1, x2, &mut row);
            for (j, v) in row.iter().enumerate() {
                out[(i, j)] = *v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid() -> (Vec<f64>, Vec<f64>) {
        let mut x1 = Vec::new();
        let mut x2 = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                x1.push(i as f64 * 0.75 - 1.0);
                x2.push(j as f64 * 1.5 + 0.5);
            }
        }
        (x1, x2)
    }

    #[test]
    fn recovers_every_registered_model() {
        let truth = [1.5, -2.0, 0.75, 3.0, -0.5, 4.25];
        let (x1, x2) = grid();

        for kind in ModelKind::ALL {
            let theta = &truth[..kind.param_count()];
            let y: Vec<f64> = x1.iter().zip(&x2).map(|(&a, &b)| predict(kind, a, b, theta)).collect();

            let model = fit(kind.index(), &x1, &x2, &y).unwrap();
            assert_eq!(model.kind(), kind);
            for (got, want) in model.coefficients().iter().zip(theta) {
                assert_abs_diff_eq!(*got, *want, epsilon = 1e-6);
            }
            let exact = predict(kind, 0.3, -1.7, theta);
            assert_abs_diff_eq!(model.evaluate(&[0.3, -1.7]).unwrap(), exact, epsilon = 1e-6);
        }
    }

    #[test]
    fn refitting_identical_inputs_is_deterministic() {
        let (x1, x2) = grid();
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .map(|(&a, &b)| 0.1 * a - 0.4 * b + a * a + 2.0 + 0.01 * (a * 7.0).sin())
            .collect();

        let first = fit(5, &x1, &x2, &y).unwrap();
        let second = fit(5, &x1, &x2, &y).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_index_fails_before_solving() {
        // Mismatched lengths would also be an error; the index check wins.
        let err = fit(6, &[1.0], &[], &[]).unwrap_err();
        assert_eq!(err, FitError::InvalidModelIndex { index: 6, max: 5 });
    }

    #[test]
    fn underdetermined_fit_is_a_convergence_error() {
        let x1 = [0.0, 1.0, 2.0, 3.0, 4.0];
        let x2 = [1.0, 0.0, 1.0, 0.0, 2.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let err = fit(5, &x1, &x2, &y).unwrap_err();
        assert!(matches!(err, FitError::Convergence { .. }), "{err:?}");
    }

    #[test]
    fn constant_predictor_is_singular() {
        // x1 never varies, so slope and intercept are not separately identifiable.
        let x1 = [2.0, 2.0, 2.0, 2.0];
        let x2 = [0.0; 4];
        let y = [1.0, 2.0, 3.0, 4.0];
        let err = fit(0, &x1, &x2, &y).unwrap_err();
        assert!(matches!(err, FitError::Convergence { .. }), "{err:?}");
    }

    #[test]
    fn offset_predictor_is_not_singular() {
        // Well-posed but poorly scaled: x1 far from zero, x1² ~ 1e6.
        let x1: Vec<f64> = (0..10).map(|i| 1000.0 + i as f64).collect();
        let x2 = vec![0.0; x1.len()];
        let theta = [1.0, 0.5, 2.0];
        let y: Vec<f64> = x1.iter().map(|&a| predict(ModelKind::QuadraticX1, a, 0.0, &theta)).collect();

        let model = fit(2, &x1, &x2, &y).unwrap();
        assert_abs_diff_eq!(model.coefficient("c").unwrap(), 0.5, epsilon = 1e-6);
        for &a in &x1 {
            let want = predict(ModelKind::QuadraticX1, a, 0.0, &theta);
            assert_abs_diff_eq!(model.evaluate(&[a, 0.0]).unwrap() / want, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn tiny_scale_predictor_is_not_singular() {
        let x1: Vec<f64> = (1..=10).map(|i| i as f64 * 1e-13).collect();
        let x2 = vec![0.0; x1.len()];
        let y: Vec<f64> = x1.iter().map(|&a| 2e13 * a + 5.0).collect();

        let model = fit(0, &x1, &x2, &y).unwrap();
        assert_abs_diff_eq!(model.coefficient("a").unwrap() / 2e13, 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(model.coefficient("f").unwrap(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn non_finite_observations_fail() {
        let err = fit(0, &[0.0, 1.0, 2.0], &[0.0; 3], &[1.0, f64::INFINITY, 3.0]).unwrap_err();
        assert!(matches!(err, FitError::Convergence { .. }), "{err:?}");
    }

    #[test]
    fn explicit_initial_guess_is_used_and_checked() {
        let x1 = [1.0, 2.0, 3.0];
        let y = [7.0, 9.0, 11.0];
        let opts = FitOptions {
            initial_guess: InitialGuess::Explicit(vec![2.0, 5.0]),
            ..FitOptions::default()
        };
        let outcome = fit_with_options(0, &x1, &[0.0; 3], &y, &opts).unwrap();
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.termination, Termination::ZeroResidual);

        let opts = FitOptions {
            initial_guess: InitialGuess::Explicit(vec![1.0; 3]),
            ..FitOptions::default()
        };
        let err = fit_with_options(0, &x1, &[0.0; 3], &y, &opts).unwrap_err();
        assert_eq!(err, FitError::Arity { expected: 2, got: 3 });
    }
}
