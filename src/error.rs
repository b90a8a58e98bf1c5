//! Error types for Synheart Motion

use thiserror::Error;

/// Errors that can occur during motion analysis
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
