//! Terminal formatting helpers.

use crate::domain::ModelKind;
use crate::fit::FitOutcome;

/// Format the model registry as a table.
pub fn format_models_table() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<5} {:<15} {:<8} {}\n", "index", "name", "params", "form"));
    for kind in ModelKind::ALL {
        out.push_str(&format!(
            "{:<5} {:<15} {:<8} {}\n",
            kind.index(),
            kind.name(),
            kind.param_names().join(","),
            kind.formula()
        ));
    }
    out
}

/// Format the fitted model and solver diagnostics.
pub fn format_fit_summary(outcome: &FitOutcome, n_obs: usize) -> String {
    let model = &outcome.model;
    let kind = model.kind();

    let mut out = String::new();
    out.push_str("=== sfit - polynomial surface fit ===\n");
    out.push_str(&format!(
        "Model: {} [{}] {}  (y = {})\n",
        kind.index(),
        kind.name(),
        kind.display_name(),
        kind.formula()
    ));
    out.push_str(&format!(
        "Solver: n={n_obs} | iterations={} | stop={:?}\n",
        outcome.iterations, outcome.termination
    ));
    out.push_str("\nCoefficients:\n");
    for (name, value) in model.named_coefficients() {
        out.push_str(&format!("  {name} = {}\n", fmt_f(value)));
    }
    out
}

/// Format evaluated points as a table.
pub fn format_predictions(points: &[(f64, f64)], y_fit: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>14} {:>14} {:>16}\n", "x1", "x2", "y_fit"));
    for (&(x1, x2), &y) in points.iter().zip(y_fit) {
        out.push_str(&format!("{:>14} {:>14} {:>16}\n", fmt_f(x1), fmt_f(x2), fmt_f(y)));
    }
    out
}

fn fmt_f(v: f64) -> String {
    if v != 0.0 && (v.abs() >= 1e6 || v.abs() < 1e-4) {
        format!("{v:.6e}")
    } else {
        format!("{v:.6}")
    }
}
