//! Core library for the housing price prediction service.
//!
//! This crate provides the domain types, feature vectorization, linear
//! regression model (training and inference), and model artifact
//! persistence shared by the HTTP server and the training tool.

pub mod dataset;
pub mod error;
pub mod model;
pub mod record;
pub mod service;
pub mod training;

pub use error::{Error, Result};
pub use model::{LinearModel, ModelArtifact};
pub use record::{FeatureVector, HousingRecord, FEATURE_COLUMNS, NUM_FEATURES};
pub use service::PredictionService;
