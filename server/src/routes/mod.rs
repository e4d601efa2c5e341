pub mod health;
pub mod predict;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::SharedState;

/// Builds the application router over the shared state.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/prediction", post(predict::predict))
        .route("/batch_prediction", post(predict::batch_predict))
        .with_state(state)
}
