//! CSV dataset loading for training.
//!
//! Selects the canonical feature columns plus a target column by header
//! name, drops any row with a missing or unparseable value in those
//! columns, and produces the matrices the fitting step consumes. Columns
//! outside the selection (e.g. `ocean_proximity` in the California housing
//! file) are ignored.

use std::path::Path;

use ndarray::{Array1, Array2};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::record::{FEATURE_COLUMNS, NUM_FEATURES};

/// Cleaned training inputs: an N×8 feature matrix and an N-element target
/// vector, row-aligned.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub features: Array2<f64>,
    pub targets: Array1<f64>,
    /// Rows excluded because a selected column was missing or not numeric
    pub rows_dropped: usize,
}

impl TrainingData {
    pub fn num_rows(&self) -> usize {
        self.targets.len()
    }
}

/// Loads a CSV file and extracts the feature matrix and target vector.
///
/// Fails with a `Dataset` error when the header lacks any required column;
/// malformed rows are dropped, not fatal.
pub fn load_training_data(path: &Path, target_column: &str) -> Result<TrainingData> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| Error::Dataset(format!("Failed to open {}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::Dataset(format!("Failed to read header row: {e}")))?
        .clone();

    let column_index = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Dataset(format!("Dataset has no '{name}' column")))
    };

    let feature_indices: Vec<usize> = FEATURE_COLUMNS
        .iter()
        .map(|name| column_index(name))
        .collect::<Result<_>>()?;
    let target_index = column_index(target_column)?;

    let mut feature_rows: Vec<f64> = Vec::new();
    let mut targets: Vec<f64> = Vec::new();
    let mut rows_dropped = 0usize;

    for record in reader.records() {
        let record =
            record.map_err(|e| Error::Dataset(format!("Failed to read CSV row: {e}")))?;

        let mut row = [0.0; NUM_FEATURES];
        let mut complete = true;
        for (slot, &index) in row.iter_mut().zip(&feature_indices) {
            match parse_cell(record.get(index)) {
                Some(value) => *slot = value,
                None => {
                    complete = false;
                    break;
                }
            }
        }

        let target = parse_cell(record.get(target_index));
        match (complete, target) {
            (true, Some(target)) => {
                feature_rows.extend_from_slice(&row);
                targets.push(target);
            }
            _ => rows_dropped += 1,
        }
    }

    if targets.is_empty() {
        return Err(Error::Dataset(format!(
            "No usable rows in {} after dropping incomplete ones",
            path.display()
        )));
    }

    if rows_dropped > 0 {
        warn!("Dropped {} rows with missing or non-numeric values", rows_dropped);
    }
    info!(
        "Loaded {} training rows from {:?} ({} features + '{}')",
        targets.len(),
        path,
        NUM_FEATURES,
        target_column
    );

    let num_rows = targets.len();
    let features = Array2::from_shape_vec((num_rows, NUM_FEATURES), feature_rows)
        .map_err(|e| Error::Dataset(format!("Failed to shape feature matrix: {e}")))?;

    Ok(TrainingData {
        features,
        targets: Array1::from_vec(targets),
        rows_dropped,
    })
}

/// Parses one CSV cell as a real number; empty or malformed cells count as
/// missing.
fn parse_cell(cell: Option<&str>) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}
