//! CSV writers for predictions and synthetic samples.
//!
//! The output is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::Observations;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct PredictionRecord {
    x1: f64,
    x2: f64,
    y_fit: f64,
}

#[derive(Debug, Serialize)]
struct ObservationRecord {
    x1: f64,
    x2: f64,
    y: f64,
}

/// Write `(x1, x2, y_fit)` rows to a CSV file.
pub fn write_predictions_csv(path: &Path, points: &[(f64, f64)], y_fit: &[f64]) -> Result<(), AppError> {
    write_predictions(create(path)?, points, y_fit)
}

/// Write observations as an `x1,x2,y` CSV file.
pub fn write_observations_csv(path: &Path, obs: &Observations) -> Result<(), AppError> {
    write_observations(create(path)?, obs)
}

pub fn write_predictions<W: Write>(writer: W, points: &[(f64, f64)], y_fit: &[f64]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (&(x1, x2), &y_fit) in points.iter().zip(y_fit) {
        wtr.serialize(PredictionRecord { x1, x2, y_fit })
            .map_err(|e| AppError::new(2, format!("Failed to write prediction row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush prediction CSV: {e}")))
}

pub fn write_observations<W: Write>(writer: W, obs: &Observations) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (x1, x2, y) in obs.rows() {
        wtr.serialize(ObservationRecord { x1, x2, y })
            .map_err(|e| AppError::new(2, format!("Failed to write observation row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush observation CSV: {e}")))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))
}
