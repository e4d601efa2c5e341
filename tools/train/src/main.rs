//! Training CLI Tool
//!
//! Fits the housing price linear regression from a CSV dataset and writes
//! the model artifact consumed by the prediction server. Runs offline, out
//! of the request path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use housing_core::dataset::load_training_data;
use housing_core::training::fit_linear_regression;
use housing_core::{ModelArtifact, FEATURE_COLUMNS};

/// Train the housing price model
#[derive(Parser, Debug)]
#[command(name = "housing-train")]
#[command(version)]
#[command(about = "Fit a linear regression over the housing dataset")]
struct Cli {
    /// CSV dataset with the feature columns and the target column
    #[arg(long, default_value = "housing.csv")]
    dataset: PathBuf,

    /// Where to write the model artifact
    #[arg(long, default_value = "model.json")]
    output: PathBuf,

    /// Name of the target column
    #[arg(long, default_value = "median_house_value")]
    target: String,

    /// Optional TOML config file; takes precedence over the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Training run configuration, either from flags or a TOML file.
#[derive(Debug, Clone, Deserialize)]
struct TrainConfig {
    /// CSV dataset path
    dataset: PathBuf,
    /// Artifact output path
    output: PathBuf,
    /// Target column name; defaults to `median_house_value`
    target: Option<String>,
}

impl TrainConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read training config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse training config {}", path.display()))
    }

    fn from_flags(cli: &Cli) -> Self {
        Self {
            dataset: cli.dataset.clone(),
            output: cli.output.clone(),
            target: Some(cli.target.clone()),
        }
    }

    fn target(&self) -> &str {
        self.target.as_deref().unwrap_or("median_house_value")
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => TrainConfig::from_file(path)?,
        None => TrainConfig::from_flags(&cli),
    };
    let (dataset, output) = (config.dataset.clone(), config.output.clone());
    let target = config.target().to_string();

    info!("Training from {:?} (target '{}')", dataset, target);
    info!("Feature columns: {:?}", FEATURE_COLUMNS);

    let data = load_training_data(&dataset, &target)
        .with_context(|| format!("Failed to load dataset {dataset:?}"))?;

    let report = fit_linear_regression(&data).context("Failed to fit linear regression")?;
    info!(
        "Fit complete: {} rows, rmse {:.2}, r² {:.4}",
        report.training_rows, report.rmse, report.r_squared
    );

    let artifact = ModelArtifact::new(&report.model, &target, report.training_rows);
    artifact
        .save(&output)
        .with_context(|| format!("Failed to write artifact {output:?}"))?;

    info!("Model artifact written to {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use housing_core::{HousingRecord, PredictionService};

    use super::*;

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.toml");
        std::fs::write(
            &path,
            "dataset = \"data/housing.csv\"\noutput = \"out/model.json\"\n",
        )
        .unwrap();

        let config = TrainConfig::from_file(&path).unwrap();
        assert_eq!(config.dataset, PathBuf::from("data/housing.csv"));
        assert_eq!(config.output, PathBuf::from("out/model.json"));
        assert_eq!(config.target(), "median_house_value");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = TrainConfig::from_file(Path::new("/nonexistent/train.toml")).unwrap_err();
        assert!(err.to_string().contains("train.toml"));
    }

    /// End-to-end: train on a tiny synthetic CSV, then serve predictions
    /// from the written artifact.
    #[test]
    fn test_train_then_predict_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("housing.csv");
        let output = dir.path().join("model.json");

        // y = 3 * median_income + 7, all other coefficients zero. Feature
        // values vary so the normal equations stay well conditioned.
        let mut file = std::fs::File::create(&dataset).unwrap();
        writeln!(
            file,
            "longitude,latitude,housing_median_age,total_rooms,total_bedrooms,\
             population,households,median_income,median_house_value"
        )
        .unwrap();
        for i in 0..40 {
            let x = i as f64;
            let income = 1.0 + 0.5 * x;
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{}",
                -120.0 - (x * 0.7).sin(),
                35.0 + (x * 1.3).cos(),
                10.0 + (x * 2.1).sin() * 5.0,
                800.0 + (x * 0.9).cos() * 100.0,
                120.0 + (x * 1.7).sin() * 30.0,
                300.0 + (x * 0.3).cos() * 50.0,
                100.0 + (x * 2.9).sin() * 20.0,
                income,
                3.0 * income + 7.0
            )
            .unwrap();
        }

        let data = load_training_data(&dataset, "median_house_value").unwrap();
        let report = fit_linear_regression(&data).unwrap();
        ModelArtifact::new(&report.model, "median_house_value", report.training_rows)
            .save(&output)
            .unwrap();

        let service = PredictionService::from_artifact(&output).unwrap();
        let record = HousingRecord {
            longitude: -121.5,
            latitude: 36.2,
            housing_median_age: 12.0,
            total_rooms: 850.0,
            total_bedrooms: 130.0,
            population: 310.0,
            households: 95.0,
            median_income: 4.0,
        };
        let predicted = service.predict_one(&record);
        assert!(
            (predicted - 19.0).abs() < 1e-6,
            "expected ~19.0, got {predicted}"
        );
    }
}
