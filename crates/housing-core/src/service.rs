//! Prediction service: an immutable model handle behind a small API.
//!
//! The service is constructed from a loaded model, so there is no
//! "uninitialized" state to guard against at runtime. It holds no mutable
//! state and is safe to share across threads behind an `Arc`.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::model::{LinearModel, ModelArtifact};
use crate::record::{vectorize_batch, HousingRecord};

/// Serves predictions from one trained model for the lifetime of the
/// process. Replacing the model means replacing the artifact and
/// restarting.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: LinearModel,
}

impl PredictionService {
    /// Wraps an already-loaded model.
    pub fn new(model: LinearModel) -> Self {
        Self { model }
    }

    /// Loads the model artifact at `path` and builds the service. Fails
    /// with a `ModelLoad` error on a missing, corrupt, or incompatible
    /// artifact; callers must treat that as fatal at startup.
    pub fn from_artifact(path: &Path) -> Result<Self> {
        let artifact = ModelArtifact::load(path)?;
        info!(
            "Loaded model from {:?} (trained on {} rows at {})",
            path, artifact.training_rows, artifact.trained_at
        );
        Ok(Self::new(artifact.into_model()?))
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Predicts the price for one record.
    pub fn predict_one(&self, record: &HousingRecord) -> f64 {
        self.model.predict(&record.to_features())
    }

    /// Predicts prices for a batch of records. The result at index `i`
    /// corresponds to `records[i]`; an empty batch yields an empty vector.
    pub fn predict_batch(&self, records: &[HousingRecord]) -> Vec<f64> {
        self.model.predict_rows(&vectorize_batch(records))
    }
}
