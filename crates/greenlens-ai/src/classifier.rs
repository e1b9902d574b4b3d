//! Classifier wrapper: the application-lifetime handle to a zero-shot model.
//!
//! The handle is built once at startup and cloned into every request. If the
//! model failed to load, the handle stays unavailable for the life of the
//! process and every call reports [`AiError::ModelUnavailable`] without
//! touching a model.

use std::path::Path;
use std::sync::Arc;

use greenlens_core::Score;

use crate::AiError;

/// A zero-shot text classifier.
pub trait ZeroShot: Send + Sync {
    /// Score `text` against `candidate_labels`, best first.
    ///
    /// With `multi_label` each label is scored independently; otherwise the
    /// scores form one distribution over the candidates.
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<Score>, AiError>;

    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;
}

/// Shared handle to at most one [`ZeroShot`] model.
#[derive(Clone)]
pub struct ClassifierHandle {
    model: Option<Arc<dyn ZeroShot>>,
}

impl std::fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("model", &self.model.as_ref().map(|m| m.model_id()))
            .finish()
    }
}

impl ClassifierHandle {
    /// Wrap an already-loaded model.
    pub fn ready(model: Arc<dyn ZeroShot>) -> Self {
        Self { model: Some(model) }
    }

    /// A handle with no model. Every classification fails with
    /// [`AiError::ModelUnavailable`].
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    /// Load the ONNX NLI model from `model_dir`.
    ///
    /// Load failures are logged and produce an unavailable handle so the
    /// service can still start and report its state.
    #[cfg(feature = "onnx")]
    pub fn load(model_dir: &Path) -> Self {
        tracing::info!(model = greenlens_core::MODEL_ID, dir = %model_dir.display(), "loading AI model");
        match crate::NliModel::load(model_dir) {
            Ok(model) => Self::ready(Arc::new(model)),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "error loading model, classification disabled");
                Self::unavailable()
            }
        }
    }

    /// Without the `onnx` feature there is no model backend to load.
    #[cfg(not(feature = "onnx"))]
    pub fn load(model_dir: &Path) -> Self {
        tracing::warn!(
            dir = %model_dir.display(),
            "built without the onnx feature, classification disabled"
        );
        Self::unavailable()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Identifier of the loaded model, if any.
    pub fn model_id(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model_id())
    }

    /// Classify through the loaded model.
    ///
    /// Checks readiness before any model call. The model's ranking is
    /// returned unchanged.
    pub fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<Score>, AiError> {
        let model = self.model.as_deref().ok_or(AiError::ModelUnavailable)?;
        if candidate_labels.is_empty() {
            return Err(AiError::NoCandidateLabels);
        }
        model.classify(text, candidate_labels, multi_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns labels in reverse candidate order so tests can tell whether
    /// anything re-sorts the model's ranking.
    struct Reversed {
        calls: AtomicUsize,
    }

    impl ZeroShot for Reversed {
        fn classify(&self, _text: &str, labels: &[&str], _multi: bool) -> Result<Vec<Score>, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(labels.iter().rev().map(|l| Score::new(*l, 0.1)).collect())
        }

        fn model_id(&self) -> &str {
            "test/reversed"
        }
    }

    #[test]
    fn unavailable_handle_refuses() {
        let handle = ClassifierHandle::unavailable();
        assert!(!handle.is_ready());
        assert!(handle.model_id().is_none());
        let err = handle.classify("text", &["a"], false).unwrap_err();
        assert!(matches!(err, AiError::ModelUnavailable));
    }

    #[test]
    fn ready_handle_preserves_model_order() {
        let handle = ClassifierHandle::ready(Arc::new(Reversed {
            calls: AtomicUsize::new(0),
        }));
        assert!(handle.is_ready());
        assert_eq!(handle.model_id(), Some("test/reversed"));
        let scores = handle.classify("text", &["a", "b", "c"], true).unwrap();
        let labels: Vec<&str> = scores.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["c", "b", "a"]);
    }

    #[test]
    fn empty_candidates_never_reach_model() {
        let model = Arc::new(Reversed {
            calls: AtomicUsize::new(0),
        });
        let handle = ClassifierHandle::ready(model.clone());
        let err = handle.classify("text", &[], false).unwrap_err();
        assert!(matches!(err, AiError::NoCandidateLabels));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clones_share_the_model() {
        let model = Arc::new(Reversed {
            calls: AtomicUsize::new(0),
        });
        let handle = ClassifierHandle::ready(model.clone());
        let other = handle.clone();
        handle.classify("x", &["a"], false).unwrap();
        other.classify("y", &["a"], false).unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn load_without_backend_is_unavailable() {
        let handle = ClassifierHandle::load(Path::new("models/missing"));
        assert!(!handle.is_ready());
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn load_from_missing_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let handle = ClassifierHandle::load(dir.path());
        assert!(!handle.is_ready());
    }
}
