//! Linear regression model and artifact persistence.
//!
//! This module provides:
//! - The in-memory model (coefficient vector + intercept)
//! - Artifact saving and loading (JSON)
//! - Load-time validation of the feature column contract

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::record::{FeatureVector, FEATURE_COLUMNS, NUM_FEATURES};

/// A fitted linear regression model: `y = c · x + b`.
///
/// Immutable after construction; inference is a pure function of the
/// coefficients and the input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: [f64; NUM_FEATURES],
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: [f64; NUM_FEATURES], intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn coefficients(&self) -> &[f64; NUM_FEATURES] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Evaluates the model against one feature vector.
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Evaluates the model against a matrix of feature vectors, one result
    /// per row, in row order.
    pub fn predict_rows(&self, rows: &[FeatureVector]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

/// Serialized form of a trained model, with enough metadata to validate the
/// training/serving contract at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature column names, in the exact order the model was trained on
    pub feature_columns: Vec<String>,
    /// Name of the predicted column
    pub target_column: String,
    /// Fitted coefficients, one per feature column
    pub coefficients: Vec<f64>,
    /// Fitted intercept
    pub intercept: f64,
    /// Number of rows the model was fitted on
    pub training_rows: usize,
    /// RFC 3339 timestamp of the training run
    pub trained_at: String,
}

impl ModelArtifact {
    /// Creates an artifact for a freshly fitted model.
    pub fn new(model: &LinearModel, target_column: &str, training_rows: usize) -> Self {
        Self {
            feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            target_column: target_column.to_string(),
            coefficients: model.coefficients().to_vec(),
            intercept: model.intercept(),
            training_rows,
            trained_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Save the artifact to a file as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize model: {e}")))?;
        fs::write(path, json)?;

        info!("Model artifact saved to {:?}", path);
        Ok(())
    }

    /// Load an artifact from a file and validate it against the canonical
    /// feature contract.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("Failed to read {}: {e}", path.display())))?;

        let artifact: ModelArtifact = serde_json::from_str(&json)
            .map_err(|e| Error::ModelLoad(format!("Failed to parse {}: {e}", path.display())))?;

        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks that the artifact matches the feature order this build
    /// serves. A permuted or renamed column list would silently corrupt
    /// every prediction, so it is rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.feature_columns.len() != NUM_FEATURES
            || self
                .feature_columns
                .iter()
                .zip(FEATURE_COLUMNS)
                .any(|(actual, expected)| actual != expected)
        {
            return Err(Error::ModelLoad(format!(
                "Artifact feature columns {:?} do not match expected {:?}",
                self.feature_columns, FEATURE_COLUMNS
            )));
        }

        if self.coefficients.len() != NUM_FEATURES {
            return Err(Error::ModelLoad(format!(
                "Artifact has {} coefficients, expected {}",
                self.coefficients.len(),
                NUM_FEATURES
            )));
        }

        Ok(())
    }

    /// Converts a validated artifact into the in-memory model.
    pub fn into_model(self) -> Result<LinearModel> {
        self.validate()?;

        let mut coefficients = [0.0; NUM_FEATURES];
        coefficients.copy_from_slice(&self.coefficients);
        Ok(LinearModel::new(coefficients, self.intercept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income_only_model() -> LinearModel {
        LinearModel::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 50_000.0], 10_000.0)
    }

    #[test]
    fn test_predict_is_dot_plus_intercept() {
        let model = income_only_model();
        let features = [-122.23, 37.88, 41.0, 880.0, 129.0, 322.0, 126.0, 8.3252];

        let price = model.predict(&features);
        let expected = 10_000.0 + 8.3252 * 50_000.0;
        assert!((price - expected).abs() <= 1e-9 * expected.abs());
        assert_eq!(expected, 426_260.0);
    }

    #[test]
    fn test_predict_rows_matches_single_predictions() {
        let model = LinearModel::new([1.0, -2.0, 0.5, 0.0, 3.0, 0.0, 1.5, 100.0], -7.0);
        let rows = [
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            [0.0; 8],
            [-1.5, 0.25, 10.0, 2.0, 0.0, 9.0, 1.0, 3.5],
        ];

        let batch = model.predict_rows(&rows);
        assert_eq!(batch.len(), rows.len());
        for (row, prediction) in rows.iter().zip(&batch) {
            assert_eq!(model.predict(row), *prediction);
        }
    }

    #[test]
    fn test_artifact_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let model = income_only_model();
        let artifact = ModelArtifact::new(&model, "median_house_value", 20_433);
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.target_column, "median_house_value");
        assert_eq!(loaded.training_rows, 20_433);
        assert_eq!(loaded.into_model().unwrap(), model);
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn test_load_rejects_permuted_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut artifact =
            ModelArtifact::new(&income_only_model(), "median_house_value", 100);
        artifact.feature_columns.swap(0, 7);
        let json = serde_json::to_string(&artifact).unwrap();
        std::fs::write(&path, json).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn test_load_rejects_wrong_coefficient_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut artifact =
            ModelArtifact::new(&income_only_model(), "median_house_value", 100);
        artifact.coefficients.pop();
        std::fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn test_load_rejects_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json at all {{{").unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
