//! Linear least squares and rank utilities.
//!
//! Every Levenberg–Marquardt step is itself a small linear least-squares problem
//!
//! ```text
//! minimize ‖ [J; √λ·D] δ − [r; 0] ‖²
//! ```
//!
//! so the solver leans on `solve_least_squares` for each trial step.
//!
//! Implementation choices:
//! - SVD rather than QR, because the augmented system is tall and nalgebra's
//!   `QR::solve` is intended for square systems.
//! - Singular-value cutoffs are relative to the largest singular value, so a
//!   uniformly tiny or huge system solves the same as a unit-scale one.
//! - `scaled_rank` normalizes columns first, so a predictor measured in odd
//!   units is not mistaken for a missing one.

use nalgebra::{DMatrix, DVector};

/// Relative singular-value cutoff used by `numerical_rank` callers.
pub const RANK_TOL: f64 = 1e-10;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    if !s_max.is_finite() {
        return None;
    }

    // Progressively looser relative tolerances before giving up.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol * s_max) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Number of singular values above `rel_tol * σ_max`.
///
/// An all-zero (or empty) matrix has rank 0.
pub fn numerical_rank(x: &DMatrix<f64>, rel_tol: f64) -> usize {
    if x.is_empty() {
        return 0;
    }
    let sv = x.singular_values();
    let s_max = sv.iter().copied().fold(0.0_f64, f64::max);
    if !(s_max.is_finite() && s_max > 0.0) {
        return 0;
    }
    sv.iter().filter(|&&s| s > rel_tol * s_max).count()
}

/// `numerical_rank` after scaling every nonzero column to unit norm.
///
/// Zero columns stay zero and still count against the rank.
pub fn scaled_rank(x: &DMatrix<f64>, rel_tol: f64) -> usize {
    let mut scaled = x.clone();
    for mut col in scaled.column_iter_mut() {
        let norm = col.norm();
        if norm > 0.0 && norm.is_finite() {
            col /= norm;
        }
    }
    numerical_rank(&scaled, rel_tol)
}
