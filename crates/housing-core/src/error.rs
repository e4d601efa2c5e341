//! Error types for the housing price prediction service.

use thiserror::Error;

/// Main error type for housing price operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required record field is absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A record field could not be converted to a real number
    #[error("Field '{field}' is not a real number (got {value})")]
    TypeConversion { field: &'static str, value: String },

    /// Model artifact could not be loaded or is incompatible
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Dataset loading or column-selection error
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Model fitting error
    #[error("Training error: {0}")]
    Training(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    /// True for errors caused by malformed caller input, as opposed to
    /// server-side failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MissingField(_) | Error::TypeConversion { .. })
    }
}

/// Specialized Result type for housing price operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingField("median_income");
        assert_eq!(err.to_string(), "Missing required field: median_income");

        let err = Error::TypeConversion {
            field: "population",
            value: "\"many\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field 'population' is not a real number (got \"many\")"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::MissingField("longitude").is_client_error());
        assert!(!Error::ModelLoad("bad artifact".to_string()).is_client_error());
    }
}
