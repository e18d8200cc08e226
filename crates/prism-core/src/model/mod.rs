//! Model loading and the single-slot model cache.
//!
//! The inference engine is an opaque ONNX session: the core hands it a
//! fixed-shape tensor and receives a fixed-length confidence vector.
//! Artifact retrieval (where the weights and label table come from) sits
//! behind the [`ModelSource`] trait; the CLI supplies a disk-backed source
//! that expects artifacts pre-downloaded by `prism models download`.

pub(crate) mod cache;
pub(crate) mod session;

use std::path::{Path, PathBuf};

use crate::error::TaggerError;

pub use cache::{ModelCache, ModelState};
pub use session::TaggerSession;

/// Local filename of the model weights within a model directory.
pub const WEIGHTS_FILENAME: &str = "model.onnx";

/// Local filename of the label table within a model directory.
pub const LABELS_FILENAME: &str = "selected_tags.csv";

/// Resolved local artifact paths for one model identifier.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    /// Path to the label table CSV
    pub labels: PathBuf,
    /// Path to the ONNX weights
    pub weights: PathBuf,
}

/// Supplies local artifact paths for a model identifier.
///
/// Failures surface verbatim as [`TaggerError::ModelLoad`]; the core adds
/// nothing and retries nothing.
pub trait ModelSource: Send + Sync {
    fn resolve(&self, model_id: &str) -> Result<ModelArtifacts, TaggerError>;
}

/// Disk-backed model source: artifacts live under `{root}/{model_id}/`.
///
/// Model identifiers may contain `/` (repository-style ids), which map to
/// nested directories.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at the given model directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory artifacts for `model_id` are expected in.
    pub fn model_dir(&self, model_id: &str) -> PathBuf {
        self.root.join(model_id)
    }

    /// Whether both artifacts for `model_id` are present on disk.
    pub fn is_installed(&self, model_id: &str) -> bool {
        let dir = self.model_dir(model_id);
        dir.join(WEIGHTS_FILENAME).exists() && dir.join(LABELS_FILENAME).exists()
    }
}

impl ModelSource for DirectorySource {
    fn resolve(&self, model_id: &str) -> Result<ModelArtifacts, TaggerError> {
        let dir = self.model_dir(model_id);
        let weights = dir.join(WEIGHTS_FILENAME);
        let labels = dir.join(LABELS_FILENAME);

        for path in [&weights, &labels] {
            if !path.exists() {
                return Err(TaggerError::ModelLoad {
                    model: model_id.to_string(),
                    message: format!(
                        "{} not found. Run `prism models download` first.",
                        display_name(path)
                    ),
                });
            }
        }

        Ok(ModelArtifacts { labels, weights })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
