//! Welcome and health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::{ModelInfo, SharedState};

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model_path: String,
    pub model: ModelInfo,
}

/// GET / - Welcome message (liveness only, no semantic contract)
pub async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the housing price prediction API".to_string(),
    })
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_path: state.config.model_path.display().to_string(),
        model: state.model_info.clone(),
    })
}
