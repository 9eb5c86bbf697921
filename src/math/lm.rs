//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ r_i(θ)²` for residuals `r_i = y_i − f_i(θ)`.
//!
//! Each iteration solves the damped system
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr
//! ```
//!
//! in its column-scaled augmented least-squares form (see `math::ols`). Accepted steps shrink
//! `λ` (towards Gauss–Newton), rejected steps grow it (towards gradient descent).
//!
//! Termination mirrors the classic MINPACK tests:
//! - `ftol`: relative reduction of the residual sum is tiny
//! - `xtol`: step is tiny relative to the parameter norm
//! - `gtol`: residuals are orthogonal to every Jacobian column

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::error::FitError;
use crate::math::solve_least_squares;

/// Damping above this means no downhill step exists at working precision.
const LAMBDA_MAX: f64 = 1e16;
const LAMBDA_MIN: f64 = 1e-15;

/// A least-squares problem the solver can drive.
pub trait LeastSquaresProblem {
    /// Number of residuals (observations).
    fn residual_count(&self) -> usize;

    /// Number of free parameters.
    fn param_count(&self) -> usize;

    /// Write `r_i = y_i − f_i(params)` into `out`.
    fn residuals(&self, params: &[f64], out: &mut DVector<f64>);

    /// Write the model Jacobian `∂f_i/∂θ_j` into `out` (`n × p`).
    ///
    /// The default uses forward differences on `residuals`.
    fn jacobian(&self, params: &[f64], out: &mut DMatrix<f64>) {
        let n = self.residual_count();
        let mut base = DVector::<f64>::zeros(n);
        let mut bumped = DVector::<f64>::zeros(n);
        self.residuals(params, &mut base);

        let mut work = params.to_vec();
        for j in 0..params.len() {
            let h = f64::EPSILON.sqrt() * params[j].abs().max(1.0);
            work[j] = params[j] + h;
            self.residuals(&work, &mut bumped);
            work[j] = params[j];
            for i in 0..n {
                // r = y - f, so ∂f/∂θ = -∂r/∂θ.
                out[(i, j)] = -(bumped[i] - base[i]) / h;
            }
        }
    }
}

/// Solver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LmConfig {
    pub max_iters: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    /// Initial damping factor.
    pub lambda_init: f64,
    /// Multiplier applied to `λ` on rejected steps (and divisor on accepted ones).
    pub lambda_factor: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            ftol: 1e-12,
            xtol: 1e-12,
            gtol: 1e-12,
            lambda_init: 1e-3,
            lambda_factor: 10.0,
        }
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    ZeroResidual,
    Ftol,
    Xtol,
    Gtol,
}

/// Successful solver output.
#[derive(Debug, Clone, PartialEq)]
pub struct LmReport {
    pub params: Vec<f64>,
    /// Final residual sum of squares.
    pub sse: f64,
    pub iterations: usize,
    pub termination: Termination,
}

/// Run Levenberg–Marquardt from `initial`.
pub fn levenberg_marquardt<P: LeastSquaresProblem>(
    problem: &P,
    initial: &[f64],
    config: &LmConfig,
) -> Result<LmReport, FitError> {
    let n = problem.residual_count();
    let p = problem.param_count();
    if initial.len() != p {
        return Err(FitError::Arity {
            expected: p,
            got: initial.len(),
        });
    }
    if n == 0 || p == 0 {
        return Err(FitError::convergence("empty least-squares problem"));
    }
    validate_config(config)?;

    let mut theta = DVector::from_column_slice(initial);
    let mut r = DVector::<f64>::zeros(n);
    problem.residuals(theta.as_slice(), &mut r);
    let mut sse = r.norm_squared();
    if !sse.is_finite() {
        return Err(FitError::convergence("non-finite residuals at the initial guess"));
    }

    let finish = |theta: DVector<f64>,
                  sse: f64,
                  iterations: usize,
                  termination: Termination|
     -> Result<LmReport, FitError> {
        debug!("lm: stopped by {termination:?} after {iterations} iterations, sse={sse:e}");
        Ok(LmReport {
            params: theta.iter().copied().collect(),
            sse,
            iterations,
            termination,
        })
    };

    if sse == 0.0 {
        return finish(theta, sse, 0, Termination::ZeroResidual);
    }

    let mut jac = DMatrix::<f64>::zeros(n, p);
    let mut lambda = config.lambda_init;
    let mut r_trial = DVector::<f64>::zeros(n);

    for iter in 1..=config.max_iters {
        problem.jacobian(theta.as_slice(), &mut jac);
        if jac.iter().any(|v| !v.is_finite()) {
            return Err(FitError::convergence("non-finite Jacobian"));
        }

        // Column scaling (Marquardt): d_j = ‖J_j‖; an all-zero column takes the
        // largest norm so it still receives damping.
        let col_norms: Vec<f64> = jac.column_iter().map(|c| c.norm()).collect();
        let c_max = col_norms.iter().fold(0.0_f64, |m, &c| m.max(c));
        let scale: Vec<f64> = col_norms
            .iter()
            .map(|&c| if c > 0.0 { c } else if c_max > 0.0 { c_max } else { 1.0 })
            .collect();

        // gtol: max |cos| between r and each Jacobian column.
        let r_norm = sse.sqrt();
        let grad = jac.tr_mul(&r);
        let g_cos = grad
            .iter()
            .zip(&col_norms)
            .filter(|(_, c)| **c > 0.0)
            .map(|(g, c)| g.abs() / (c * r_norm))
            .fold(0.0_f64, f64::max);
        if g_cos <= config.gtol {
            return finish(theta, sse, iter - 1, Termination::Gtol);
        }

        // Solve for z = D·δ against [J·D⁻¹; √λ·I], which is well scaled even
        // when the columns of J differ by many orders of magnitude.
        let mut scaled_jac = jac.clone();
        for (j, mut col) in scaled_jac.column_iter_mut().enumerate() {
            col /= scale[j];
        }

        loop {
            let mut aug = DMatrix::<f64>::zeros(n + p, p);
            aug.rows_mut(0, n).copy_from(&scaled_jac);
            for j in 0..p {
                aug[(n + j, j)] = lambda.sqrt();
            }
            let mut rhs = DVector::<f64>::zeros(n + p);
            rhs.rows_mut(0, n).copy_from(&r);

            let Some(z) = solve_least_squares(&aug, &rhs) else {
                lambda = grow(lambda, config)?;
                continue;
            };
            let delta = DVector::from_iterator(p, z.iter().zip(&scale).map(|(zj, sj)| zj / sj));

            let theta_trial = &theta + &delta;
            problem.residuals(theta_trial.as_slice(), &mut r_trial);
            let sse_trial = r_trial.norm_squared();
            let step_small = delta.norm() <= config.xtol * (theta.norm() + config.xtol);

            trace!(
                "lm: iter={iter} lambda={lambda:e} sse={sse:e} trial_sse={sse_trial:e} step={:e}",
                delta.norm()
            );

            if sse_trial.is_finite() && sse_trial < sse {
                let reduction = (sse - sse_trial) / sse;
                theta = theta_trial;
                std::mem::swap(&mut r, &mut r_trial);
                sse = sse_trial;
                lambda = (lambda / config.lambda_factor).max(LAMBDA_MIN);

                if sse == 0.0 {
                    return finish(theta, sse, iter, Termination::ZeroResidual);
                }
                if reduction <= config.ftol {
                    return finish(theta, sse, iter, Termination::Ftol);
                }
                if step_small {
                    return finish(theta, sse, iter, Termination::Xtol);
                }
                break;
            }

            // No improvement from a negligible step: already at the minimum.
            if step_small {
                return finish(theta, sse, iter, Termination::Xtol);
            }
            lambda = grow(lambda, config)?;
        }
    }

    Err(FitError::convergence(format!(
        "iteration limit ({}) reached, sse={sse:e}",
        config.max_iters
    )))
}

fn grow(lambda: f64, config: &LmConfig) -> Result<f64, FitError> {
    let next = lambda * config.lambda_factor;
    if next > LAMBDA_MAX {
        return Err(FitError::convergence("damping diverged without a downhill step"));
    }
    Ok(next)
}

fn validate_config(config: &LmConfig) -> Result<(), FitError> {
    let tols_ok = [config.ftol, config.xtol, config.gtol]
        .iter()
        .all(|t| t.is_finite() && *t >= 0.0);
    if config.max_iters == 0
        || !tols_ok
        || !(config.lambda_init.is_finite() && config.lambda_init > 0.0)
        || !(config.lambda_factor.is_finite() && config.lambda_factor > 1.0)
    {
        return Err(FitError::convergence(format!("invalid solver settings: {config:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// y = a·exp(b·t): a genuinely nonlinear problem, finite-difference Jacobian.
    struct ExpDecay {
        t: Vec<f64>,
        y: Vec<f64>,
    }

    impl LeastSquaresProblem for ExpDecay {
        fn residual_count(&self) -> usize {
            self.t.len()
        }

        fn param_count(&self) -> usize {
            2
        }

        fn residuals(&self, params: &[f64], out: &mut DVector<f64>) {
            for (i, (&t, &y)) in self.t.iter().zip(&self.y).enumerate() {
                out[i] = y - params[0] * (params[1] * t).exp();
            }
        }
    }

    fn exp_decay() -> ExpDecay {
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.3).collect();
        let y = t.iter().map(|&t| 3.0 * (-0.7 * t).exp()).collect();
        ExpDecay { t, y }
    }

    #[test]
    fn recovers_exponential_parameters() {
        let report = levenberg_marquardt(&exp_decay(), &[1.0, 0.0], &LmConfig::default()).unwrap();
        assert_abs_diff_eq!(report.params[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(report.params[1], -0.7, epsilon = 1e-6);
        assert!(report.sse < 1e-12);
    }

    #[test]
    fn exact_initial_guess_stops_immediately() {
        let report = levenberg_marquardt(&exp_decay(), &[3.0, -0.7], &LmConfig::default()).unwrap();
        assert!(report.iterations <= 1);
    }

    #[test]
    fn iteration_limit_is_a_convergence_error() {
        let config = LmConfig {
            max_iters: 1,
            ftol: 0.0,
            xtol: 0.0,
            gtol: 0.0,
            ..LmConfig::default()
        };
        let err = levenberg_marquardt(&exp_decay(), &[1.0, 0.0], &config).unwrap_err();
        assert!(matches!(err, FitError::Convergence { .. }), "{err:?}");
    }

    #[test]
    fn rejects_wrong_initial_length_and_bad_settings() {
        let err = levenberg_marquardt(&exp_decay(), &[1.0], &LmConfig::default()).unwrap_err();
        assert_eq!(err, FitError::Arity { expected: 2, got: 1 });

        let config = LmConfig {
            lambda_factor: 1.0,
            ..LmConfig::default()
        };
        assert!(levenberg_marquardt(&exp_decay(), &[1.0, 0.0], &config).is_err());
    }

    /// y = a·x + f with columns of wildly different scale.
    struct TinyLine {
        x: Vec<f64>,
        y: Vec<f64>,
    }

    impl LeastSquaresProblem for TinyLine {
        fn residual_count(&self) -> usize {
            self.x.len()
        }

        fn param_count(&self) -> usize {
            2
        }

        fn residuals(&self, params: &[f64], out: &mut DVector<f64>) {
            for (i, (&x, &y)) in self.x.iter().zip(&self.y).enumerate() {
                out[i] = y - (params[0] * x + params[1]);
            }
        }

        fn jacobian(&self, _params: &[f64], out: &mut DMatrix<f64>) {
            for (i, &x) in self.x.iter().enumerate() {
                out[(i, 0)] = x;
                out[(i, 1)] = 1.0;
            }
        }
    }

    #[test]
    fn small_scale_column_is_not_dropped() {
        let x: Vec<f64> = (1..=10).map(|i| i as f64 * 1e-13).collect();
        let y = x.iter().map(|&x| 2e13 * x + 5.0).collect();
        let report = levenberg_marquardt(&TinyLine { x, y }, &[1.0, 1.0], &LmConfig::default()).unwrap();
        assert_abs_diff_eq!(report.params[0] / 2e13, 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(report.params[1], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn non_finite_data_fails() {
        let mut problem = exp_decay();
        problem.y[3] = f64::NAN;
        let err = levenberg_marquardt(&problem, &[1.0, 0.0], &LmConfig::default()).unwrap_err();
        assert!(matches!(err, FitError::Convergence { .. }));
    }
}
