//! Single-slot model cache.
//!
//! At most one model is loaded at a time, keyed by its identifier:
//! requesting the cached id reuses the loaded state, requesting a
//! different id replaces it. This is a single slot with an explicit
//! `current_id`, not an LRU. A load failure leaves the previous state
//! intact and unreferenced by the failing call.

use std::sync::Arc;

use crate::error::TaggerError;
use crate::labels::LabelTable;

use super::session::TaggerSession;
use super::ModelSource;

/// Everything loaded for one model identifier.
#[derive(Debug)]
pub struct ModelState {
    /// The vocabulary the confidence vector is aligned with
    pub table: LabelTable,
    /// The inference session
    pub session: TaggerSession,
    /// Square input side the normalizer must produce
    pub target_side: u32,
}

/// Replace-on-different-id cache holding at most one [`ModelState`].
///
/// Swaps must be externally serialized (the predictor holds this behind a
/// `Mutex`); reads of an already-loaded state are safe to share via the
/// returned `Arc`.
pub struct ModelCache {
    current_id: Option<String>,
    state: Option<Arc<ModelState>>,
}

impl ModelCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            current_id: None,
            state: None,
        }
    }

    /// The identifier of the currently loaded model, if any.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Get the state for `model_id`, loading it if it is not the cached one.
    ///
    /// `fallback_side` is used when the model does not declare concrete
    /// spatial input dimensions. On any load error the cache is left
    /// unchanged, so a still-cached different model stays usable.
    pub fn load(
        &mut self,
        model_id: &str,
        source: &dyn ModelSource,
        fallback_side: u32,
    ) -> Result<Arc<ModelState>, TaggerError> {
        if self.current_id.as_deref() == Some(model_id) {
            if let Some(state) = &self.state {
                return Ok(Arc::clone(state));
            }
        }

        let artifacts = source.resolve(model_id)?;
        let table = LabelTable::from_csv_file(&artifacts.labels)?;
        let session = TaggerSession::load(&artifacts.weights, model_id)?;
        let target_side = match session.input_side() {
            Some(side) => side,
            None => {
                tracing::debug!(
                    "Model {} declares no concrete input side; using {}",
                    model_id,
                    fallback_side
                );
                fallback_side
            }
        };

        tracing::info!(
            "Loaded model {} ({} labels, input {}x{})",
            model_id,
            table.len(),
            target_side,
            target_side
        );

        let state = Arc::new(ModelState {
            table,
            session,
            target_side,
        });
        self.current_id = Some(model_id.to_string());
        self.state = Some(Arc::clone(&state));
        Ok(state)
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelArtifacts, DirectorySource};

    struct FailingSource;

    impl ModelSource for FailingSource {
        fn resolve(&self, model_id: &str) -> Result<ModelArtifacts, TaggerError> {
            Err(TaggerError::ModelLoad {
                model: model_id.to_string(),
                message: "artifact store unreachable".to_string(),
            })
        }
    }

    #[test]
    fn test_empty_cache_has_no_id() {
        let cache = ModelCache::new();
        assert!(cache.current_id().is_none());
    }

    #[test]
    fn test_load_failure_leaves_cache_unchanged() {
        let mut cache = ModelCache::new();
        let err = cache.load("missing/model", &FailingSource, 448).unwrap_err();
        assert!(err.to_string().contains("missing/model"));
        assert!(cache.current_id().is_none());
    }

    #[test]
    fn test_resolve_failure_reported_before_any_load() {
        // A disk source with nothing installed fails at resolve; the cache
        // must not record the id.
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        let mut cache = ModelCache::new();

        assert!(cache.load("acme/tagger", &source, 448).is_err());
        assert!(cache.current_id().is_none());
    }
}
