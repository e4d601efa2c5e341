//! Housing Price Prediction Server
//!
//! HTTP API server exposing single and batch price predictions from a
//! pre-trained linear regression model. The model artifact is loaded once
//! at startup; a load failure aborts startup before the listener binds.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use housing_core::{ModelArtifact, PredictionService};

use crate::state::{AppState, ModelInfo, ServerConfig};

/// Housing Price Prediction Server
#[derive(Parser, Debug)]
#[command(name = "housing-server")]
#[command(version)]
#[command(about = "HTTP API server for housing price predictions")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to the trained model artifact
    #[arg(long, env = "HOUSING_MODEL_PATH", default_value = "model.json")]
    model: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    info!("Housing Price Prediction Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Model artifact: {:?}", cli.model);

    // Load the model before binding; a bad artifact must abort startup
    // rather than serve garbage.
    let artifact = ModelArtifact::load(&cli.model)
        .with_context(|| format!("Failed to load model from {:?}", cli.model))?;
    let model_info = ModelInfo {
        target_column: artifact.target_column.clone(),
        training_rows: artifact.training_rows,
        trained_at: artifact.trained_at.clone(),
    };
    let service = PredictionService::new(artifact.into_model()?);
    info!(
        "Model ready (trained on {} rows at {})",
        model_info.training_rows, model_info.trained_at
    );

    // Create shared state
    let state = Arc::new(AppState::new(
        ServerConfig {
            model_path: cli.model,
        },
        service,
        model_info,
    ));

    // Build router with middleware
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
