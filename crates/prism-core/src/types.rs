//! Core data types for the Prism tagging pipeline.
//!
//! These types represent the output of running an image through the
//! classifier and the decision policies applied to its confidence vector.

use serde::{Deserialize, Serialize};

/// A single tag with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagScore {
    /// The tag label (e.g., "long hair", "smile")
    pub name: String,

    /// Confidence score from 0.0 to 1.0
    pub confidence: f32,
}

impl TagScore {
    /// Create a new tag score.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Threshold decision policy for one tag category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    /// Accept every tag with confidence strictly above the given value.
    Fixed(f32),

    /// Adaptive maximum-cut thresholding: the cutoff is placed at the
    /// largest gap between consecutive sorted confidences, clamped upward
    /// to `floor`.
    AdaptiveMaxCut { floor: f32 },
}

/// Which categorical dialect to render into [`Prediction::categorical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoricalStyle {
    /// Confidence-ordered underscore tags, deduplicated.
    #[default]
    Plain,

    /// Bucketed by category with NSFW tags last; see
    /// [`crate::tags::TagFormatter::imageboard_enriched`].
    Enriched,
}

/// The complete result of tagging one image.
///
/// The three per-category lists are ordered name/confidence mappings:
/// `ratings` preserves label-table order, `general` and `characters`
/// preserve it too (acceptance does not reorder). The two strings are
/// renderings of the accepted general tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Comma-separated tag string, confidence-descending, parens escaped.
    pub standard: String,

    /// Space-separated imageboard dialect string.
    pub categorical: String,

    /// Rating tags that cleared the rating threshold.
    pub ratings: Vec<TagScore>,

    /// Character tags that cleared the character policy.
    pub characters: Vec<TagScore>,

    /// General tags that cleared the general policy.
    pub general: Vec<TagScore>,

    /// Diagnostic message when the prediction failed. All other fields
    /// are empty in that case, apart from `standard` which carries the
    /// same diagnostic for plain-text consumers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Prediction {
    /// Build an error-shaped prediction: the diagnostic string plus empty
    /// result mappings. Batch processing uses this to isolate failures.
    pub fn from_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            standard: message.clone(),
            categorical: String::new(),
            ratings: Vec::new(),
            characters: Vec::new(),
            general: Vec::new(),
            error: Some(message),
        }
    }

    /// Whether this prediction is error-shaped.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_prediction_has_empty_mappings() {
        let pred = Prediction::from_error("Model loading failed for x: gone");
        assert!(pred.is_error());
        assert_eq!(pred.standard, "Model loading failed for x: gone");
        assert!(pred.categorical.is_empty());
        assert!(pred.ratings.is_empty());
        assert!(pred.characters.is_empty());
        assert!(pred.general.is_empty());
    }

    #[test]
    fn test_prediction_serde_skips_absent_error() {
        let pred = Prediction {
            standard: "1girl, smile".to_string(),
            categorical: "1girl smile".to_string(),
            ratings: vec![TagScore::new("general", 0.9)],
            characters: vec![],
            general: vec![TagScore::new("1girl", 0.95), TagScore::new("smile", 0.8)],
            error: None,
        };
        let json = serde_json::to_string(&pred).unwrap();
        assert!(!json.contains("error"));

        let parsed: Prediction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.general.len(), 2);
        assert_eq!(parsed.general[0].name, "1girl");
    }

    #[test]
    fn test_tag_score_roundtrip() {
        let tag = TagScore::new("long hair", 0.83);
        let json = serde_json::to_string(&tag).unwrap();
        let parsed: TagScore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tag);
    }
}
