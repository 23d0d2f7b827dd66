//! Error types for Adaptune
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using AdaptuneError
pub type Result<T> = std::result::Result<T, AdaptuneError>;

/// Unified error type for Adaptune operations
#[derive(Debug, Error)]
pub enum AdaptuneError {
    // Model errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // Controller manager errors
    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    // Episode monitor errors
    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    // Environment errors
    #[error("Environment error: {0}")]
    Environment(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Model parameter and input errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Arity mismatch: expected {expected} parameters, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Missing input: observation has {len} components, input {index} required")]
    MissingInput { index: usize, len: usize },
}

/// Controller manager errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManagerError {
    #[error("Controller index {index} out of range for {len} controllers")]
    OutOfRange { index: usize, len: usize },
}

/// Episode monitor errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Metric '{name}' missing from episode record")]
    MissingMetric { name: String },
}

impl From<serde_json::Error> for AdaptuneError {
    fn from(err: serde_json::Error) -> Self {
        AdaptuneError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AdaptuneError {
    fn from(err: std::io::Error) -> Self {
        AdaptuneError::Environment(err.to_string())
    }
}

impl From<anyhow::Error> for AdaptuneError {
    fn from(err: anyhow::Error) -> Self {
        AdaptuneError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdaptuneError::Model(ModelError::ArityMismatch {
            expected: 3,
            actual: 4,
        });
        assert!(err.to_string().contains("expected 3"));
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn test_manager_error() {
        let err = ManagerError::OutOfRange { index: 10, len: 0 };
        assert!(err.to_string().contains("index 10"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse = serde_json::from_str::<Vec<f64>>("[1, oops]").unwrap_err();
        let err: AdaptuneError = parse.into();
        assert!(matches!(err, AdaptuneError::Serialization(_)));
    }
}
