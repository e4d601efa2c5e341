//! Application state for the prediction server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use housing_core::PredictionService;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Path the model artifact was loaded from
    pub model_path: PathBuf,
}

/// Metadata about the loaded model, surfaced by the health endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct ModelInfo {
    pub target_column: String,
    pub training_rows: usize,
    pub trained_at: String,
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The prediction service; read-only after startup
    pub service: PredictionService,
    /// Metadata of the loaded artifact
    pub model_info: ModelInfo,
    /// Server start time
    pub started_at: Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: ServerConfig, service: PredictionService, model_info: ModelInfo) -> Self {
        Self {
            config,
            service,
            model_info,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
