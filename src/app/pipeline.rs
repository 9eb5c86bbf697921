//! The `sfit fit` workflow, kept apart from presentation:
//! load CSV -> fit -> evaluate requested points.
//!
//! Nothing is persisted; the fitted model lives only for this run.

use std::path::PathBuf;

use log::info;

use crate::domain::ModelKind;
use crate::error::AppError;
use crate::fit::{FitOptions, FitOutcome, fit_model};
use crate::io::{load_observations, load_points};

/// A run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `SFIT_*` env vars).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub model: ModelKind,
    pub data_path: PathBuf,
    pub eval_points: Vec<(f64, f64)>,
    pub points_path: Option<PathBuf>,
    pub export_predictions: Option<PathBuf>,
    pub options: FitOptions,
    pub json: bool,
}

/// All computed outputs of a single `sfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub n_obs: usize,
    pub outcome: FitOutcome,
    /// `--eval` points first, then rows of the points file.
    pub points: Vec<(f64, f64)>,
    pub predictions: Vec<f64>,
}

/// Execute the fit pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let obs = load_observations(&config.data_path)?;
    info!("loaded {} observations from {}", obs.len(), config.data_path.display());

    let outcome = fit_model(config.model, &obs, &config.options)?;

    let mut points = config.eval_points.clone();
    if let Some(path) = &config.points_path {
        points.extend(load_points(path)?);
    }
    let predictions = outcome.model.evaluate_many(&points);

    Ok(RunOutput {
        n_obs: obs.len(),
        outcome,
        points,
        predictions,
    })
}
