//! Sub-configuration structs with defaults matching the shipped policies.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where model artifacts are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.prism/models"),
        }
    }
}

/// Default thresholds and floors for the decision policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Fixed cutoff for general tags
    pub general: f32,

    /// Fixed cutoff for character tags
    pub character: f32,

    /// Fixed cutoff for rating tags
    pub rating: f32,

    /// Lower bound on the adaptive cutoff for character tags
    pub character_mcut_floor: f32,

    /// Lower bound on the adaptive cutoff for general tags
    pub general_mcut_floor: f32,

    /// Minimum confidence kept by the enriched categorical dialect
    pub min_categorical_confidence: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            general: 0.35,
            character: 0.85,
            rating: 0.5,
            character_mcut_floor: 0.15,
            general_mcut_floor: 0.0,
            min_categorical_confidence: 0.1,
        }
    }
}

/// Model selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier used when none is given on the command line
    pub default_model: String,

    /// Input side used when a model declares no concrete spatial shape
    pub fallback_input_size: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default_model: "SmilingWolf/wd-swinv2-tagger-v3".to_string(),
            fallback_input_size: 448,
        }
    }
}

/// Input handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Supported input file extensions
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
            ],
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text", "json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
