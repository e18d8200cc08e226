//! Prism Core - Multi-label image tagging library.
//!
//! Prism classifies an image against a fixed imageboard-style vocabulary
//! (general descriptors, character identities, and a small rating
//! taxonomy) using a pre-trained ONNX classifier, then renders the
//! accepted tags under configurable decision policies.
//!
//! # Architecture
//!
//! ```text
//! Image → Normalize (white pad, BGR, NHWC) → ONNX inference
//!       → Split by category → Threshold (fixed / MCut) → Format
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism_core::{Config, DirectorySource, Predictor, PredictOptions};
//!
//! let config = Config::load()?;
//! let source = DirectorySource::new(config.model_dir());
//! let predictor = Predictor::new(config.clone(), Box::new(source));
//!
//! let image = prism_core::decode::load_image("./image.png".as_ref())?;
//! let options = PredictOptions::from_config(&config, "SmilingWolf/wd-swinv2-tagger-v3");
//! let prediction = predictor.predict(Some(&image), &options);
//! println!("{}", prediction.standard);
//! ```

// Module declarations
pub mod config;
pub mod decode;
pub mod error;
pub mod labels;
pub mod model;
pub mod output;
pub mod predictor;
pub mod preprocess;
pub mod tags;
pub mod threshold;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PrismError, Result, TaggerError, TaggerResult};
pub use labels::{LabelEntry, LabelTable, TagCategory};
pub use model::{DirectorySource, ModelArtifacts, ModelCache, ModelSource};
pub use output::{OutputFormat, OutputWriter};
pub use predictor::{PredictOptions, Predictor};
pub use tags::{Lexicon, TagFormatter};
pub use types::{CategoricalStyle, Prediction, TagScore, ThresholdPolicy};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
