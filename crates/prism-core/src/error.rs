//! Error types for the Prism tagging pipeline.
//!
//! Errors are organized by concern: configuration errors on one side,
//! tagging errors (model loading, inference, input handling) on the other.
//! Tagging errors are recovered at the prediction boundary and never abort
//! a batch; see [`crate::predictor`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tagging pipeline errors
    #[error("Tagger error: {0}")]
    Tagger(#[from] TaggerError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tagging pipeline errors.
///
/// `ModelLoad` leaves any previously cached model untouched; `Inference`
/// and `Input` fail only the current prediction.
#[derive(Error, Debug)]
pub enum TaggerError {
    /// Model artifact missing or failed to load
    #[error("Model loading failed for {model}: {message}")]
    ModelLoad { model: String, message: String },

    /// The inference engine raised during execution
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// No usable image was supplied
    #[error("Invalid input: {message}")]
    Input { message: String },

    /// Label table missing, malformed, or inconsistent
    #[error("Label table error for {path}: {message}")]
    Labels { path: PathBuf, message: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;

/// Convenience type alias for tagging results.
pub type TaggerResult<T> = std::result::Result<T, TaggerError>;
