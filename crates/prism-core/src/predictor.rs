//! The prediction call surface: normalize → infer → split → threshold →
//! format, with error recovery at the boundary.
//!
//! Every tagging error (model load, inference, missing input) is converted
//! here into an error-shaped [`Prediction`], so callers (the batch loop in
//! particular) never have to unwind past a single image.

use std::sync::Mutex;

use image::DynamicImage;

use crate::config::Config;
use crate::error::TaggerError;
use crate::model::{ModelCache, ModelSource};
use crate::preprocess;
use crate::tags::{split, Lexicon, TagFormatter};
use crate::threshold;
use crate::types::{CategoricalStyle, Prediction, ThresholdPolicy};

/// Per-call decision policies.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Model identifier to tag with
    pub model_id: String,

    /// Policy for general tags
    pub general: ThresholdPolicy,

    /// Policy for character tags
    pub character: ThresholdPolicy,

    /// Fixed cutoff for rating tags (ratings never use the adaptive path)
    pub rating_threshold: f32,

    /// Which categorical dialect to render
    pub categorical_style: CategoricalStyle,
}

impl PredictOptions {
    /// Build options from configured defaults for the given model.
    pub fn from_config(config: &Config, model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            general: ThresholdPolicy::Fixed(config.thresholds.general),
            character: ThresholdPolicy::Fixed(config.thresholds.character),
            rating_threshold: config.thresholds.rating,
            categorical_style: CategoricalStyle::Plain,
        }
    }
}

/// Runs the full inference-to-tags pipeline.
///
/// Holds the single-slot model cache behind a `Mutex`: model swaps are
/// serialized, reads of an already-loaded model share the state.
pub struct Predictor {
    source: Box<dyn ModelSource>,
    cache: Mutex<ModelCache>,
    formatter: TagFormatter,
    config: Config,
}

impl Predictor {
    /// Create a predictor over the given artifact source.
    pub fn new(config: Config, source: Box<dyn ModelSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(ModelCache::new()),
            formatter: TagFormatter::new(Lexicon::new()),
            config,
        }
    }

    /// The formatter, for callers that post-process tags themselves.
    pub fn formatter(&self) -> &TagFormatter {
        &self.formatter
    }

    /// Tag one image.
    ///
    /// Never panics and never returns an error: failures come back as an
    /// error-shaped [`Prediction`] carrying the diagnostic.
    pub fn predict(&self, image: Option<&DynamicImage>, options: &PredictOptions) -> Prediction {
        match self.try_predict(image, options) {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::warn!("Prediction failed: {e}");
                Prediction::from_error(e.to_string())
            }
        }
    }

    /// Tag a batch of images, one at a time in input order.
    ///
    /// A failure on one image yields an error-shaped result at its
    /// position and does not abort the rest.
    pub fn predict_batch(
        &self,
        images: &[DynamicImage],
        options: &PredictOptions,
    ) -> Vec<Prediction> {
        let total = images.len();
        images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                tracing::debug!("Tagging image {}/{}", i + 1, total);
                self.predict(Some(image), options)
            })
            .collect()
    }

    fn try_predict(
        &self,
        image: Option<&DynamicImage>,
        options: &PredictOptions,
    ) -> Result<Prediction, TaggerError> {
        let image = image.ok_or_else(|| TaggerError::Input {
            message: "no image provided".to_string(),
        })?;

        let state = {
            let mut cache = self.cache.lock().map_err(|e| TaggerError::Inference {
                message: format!("Model cache lock poisoned: {e}"),
            })?;
            cache.load(
                &options.model_id,
                self.source.as_ref(),
                self.config.model.fallback_input_size,
            )?
        };

        let tensor = preprocess::normalize(image, state.target_side);
        let confidences = state.session.infer(&tensor)?;

        if confidences.len() != state.table.len() {
            return Err(TaggerError::Inference {
                message: format!(
                    "Confidence vector length {} does not match label table size {}",
                    confidences.len(),
                    state.table.len()
                ),
            });
        }

        let scores = split(&confidences, &state.table);

        let ratings = threshold::accept(
            &scores.ratings,
            ThresholdPolicy::Fixed(options.rating_threshold),
        );
        let general = threshold::accept(&scores.general, options.general);
        let characters = threshold::accept(&scores.characters, options.character);

        let standard = self.formatter.standard(&general);
        let categorical = match options.categorical_style {
            CategoricalStyle::Plain => self.formatter.imageboard(&general),
            CategoricalStyle::Enriched => self.formatter.imageboard_enriched(
                &general,
                &characters,
                self.config.thresholds.min_categorical_confidence,
            ),
        };

        Ok(Prediction {
            standard,
            categorical,
            ratings,
            characters,
            general,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelArtifacts;
    use image::RgbImage;

    struct UnreachableSource;

    impl ModelSource for UnreachableSource {
        fn resolve(&self, model_id: &str) -> Result<ModelArtifacts, TaggerError> {
            Err(TaggerError::ModelLoad {
                model: model_id.to_string(),
                message: "artifact store unreachable".to_string(),
            })
        }
    }

    fn predictor() -> Predictor {
        Predictor::new(Config::default(), Box::new(UnreachableSource))
    }

    fn options() -> PredictOptions {
        PredictOptions::from_config(&Config::default(), "acme/tagger-v3")
    }

    #[test]
    fn test_missing_image_reported_without_inference() {
        let pred = predictor().predict(None, &options());
        assert!(pred.is_error());
        assert!(pred.standard.contains("no image provided"), "{}", pred.standard);
        assert!(pred.general.is_empty());
    }

    #[test]
    fn test_model_load_failure_becomes_error_prediction() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let pred = predictor().predict(Some(&image), &options());
        assert!(pred.is_error());
        assert!(pred.standard.contains("acme/tagger-v3"), "{}", pred.standard);
        assert!(pred.categorical.is_empty());
        assert!(pred.ratings.is_empty());
    }

    #[test]
    fn test_batch_isolates_failures_per_item() {
        let images = vec![
            DynamicImage::ImageRgb8(RgbImage::new(2, 2)),
            DynamicImage::ImageRgb8(RgbImage::new(3, 3)),
        ];
        let results = predictor().predict_batch(&images, &options());
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.is_error());
        }
    }

    #[test]
    fn test_options_from_config_defaults() {
        let opts = options();
        assert_eq!(opts.general, ThresholdPolicy::Fixed(0.35));
        assert_eq!(opts.character, ThresholdPolicy::Fixed(0.85));
        assert!((opts.rating_threshold - 0.5).abs() < 1e-6);
        assert_eq!(opts.categorical_style, CategoricalStyle::Plain);
    }
}
