//! Command-line parsing for the surface fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.
//!
//! Solver settings fall back to `SFIT_*` environment variables (a `.env` file is
//! loaded first), then to the built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ModelKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sfit", version, about = "Polynomial surface fitter for two predictors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered model forms.
    Models,
    /// Fit a model to `x1,x2,y` CSV data and evaluate it at the requested points.
    Fit(FitArgs),
    /// Write synthetic `x1,x2,y` data generated from a known model.
    Sample(SampleArgs),
}

/// Options for fitting and evaluating.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Model to fit: registry index (0-5), `m0`..`m5`, or name.
    #[arg(short = 'm', long)]
    pub model: ModelKind,

    /// Training data CSV with columns x1,x2,y.
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: PathBuf,

    /// Evaluate at a point `x1,x2` (repeatable; extra components are ignored).
    #[arg(short = 'e', long = "eval", value_name = "X1,X2", value_parser = parse_point, allow_hyphen_values = true)]
    pub eval: Vec<(f64, f64)>,

    /// Evaluate every row of a CSV with columns x1,x2.
    #[arg(long, value_name = "CSV")]
    pub points: Option<PathBuf>,

    /// Write evaluated points to a CSV file.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Explicit solver starting point (defaults to all ones).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub initial: Option<Vec<f64>>,

    /// Print a JSON document instead of tables.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Levenberg–Marquardt settings.
#[derive(Debug, Args, Clone)]
pub struct SolverArgs {
    /// Maximum solver iterations.
    #[arg(long, env = "SFIT_MAX_ITERS", default_value_t = 200)]
    pub max_iters: usize,

    /// Relative residual-reduction tolerance.
    #[arg(long, env = "SFIT_FTOL", default_value_t = 1e-12)]
    pub ftol: f64,

    /// Relative step-size tolerance.
    #[arg(long, env = "SFIT_XTOL", default_value_t = 1e-12)]
    pub xtol: f64,

    /// Gradient orthogonality tolerance.
    #[arg(long, env = "SFIT_GTOL", default_value_t = 1e-12)]
    pub gtol: f64,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Model to sample from: registry index (0-5), `m0`..`m5`, or name.
    #[arg(short = 'm', long)]
    pub model: ModelKind,

    /// True coefficients, comma-separated in the model's parameter order.
    #[arg(short = 'c', long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub coefs: Vec<f64>,

    /// Number of observations.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub count: usize,

    /// Standard deviation of Gaussian noise added to y.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Lower bound for both predictors.
    #[arg(long, default_value_t = -5.0, allow_hyphen_values = true)]
    pub x_min: f64,

    /// Upper bound for both predictors.
    #[arg(long, default_value_t = 5.0, allow_hyphen_values = true)]
    pub x_max: f64,

    /// Output CSV (stdout when omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}

/// Parse `x1,x2[,...]`; components past the second are ignored.
pub fn parse_point(raw: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return Err(format!("expected at least two comma-separated values, got '{raw}'"));
    }
    let parse = |s: &str| s.parse::<f64>().map_err(|e| format!("invalid number '{s}': {e}"));
    Ok((parse(parts[0])?, parse(parts[1])?))
}
