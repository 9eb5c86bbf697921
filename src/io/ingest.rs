//! CSV ingest.
//!
//! Two input shapes are supported:
//! - training data with header columns `x1,x2,y`
//! - evaluation points with header columns `x1,x2`
//!
//! Extra columns are ignored and column order does not matter. A malformed
//! row aborts the load with its line number (exit code 2). No NaN/Inf
//! filtering happens here; the fitter decides what non-finite data means.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::Observations;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct ObservationRecord {
    x1: f64,
    x2: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    x1: f64,
    x2: f64,
}

/// Load training observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<Observations, AppError> {
    let file = open(path)?;
    read_observations(file)
}

/// Load evaluation points from a CSV file.
pub fn load_points(path: &Path) -> Result<Vec<(f64, f64)>, AppError> {
    let file = open(path)?;
    read_points(file)
}

pub fn read_observations<R: Read>(reader: R) -> Result<Observations, AppError> {
    let records: Vec<ObservationRecord> = read_records(reader)?;
    let (mut x1, mut x2, mut y) = (Vec::new(), Vec::new(), Vec::new());
    for r in records {
        x1.push(r.x1);
        x2.push(r.x2);
        y.push(r.y);
    }
    Ok(Observations::new(x1, x2, y)?)
}

pub fn read_points<R: Read>(reader: R) -> Result<Vec<(f64, f64)>, AppError> {
    let records: Vec<PointRecord> = read_records(reader)?;
    Ok(records.into_iter().map(|r| (r.x1, r.x2)).collect())
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn read_records<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        // +2: one header line, and CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV line {line}: {e}")))?;
        out.push(record);
    }
    Ok(out)
}
