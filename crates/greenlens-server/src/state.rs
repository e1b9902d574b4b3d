use std::sync::Arc;

use greenlens_ai::{Analyzer, ClassifierHandle};
use greenlens_extract::OcrEngine;

use crate::ServerConfig;

/// Application-lifetime state shared by every handler.
///
/// Built once at startup. The analyzer's classifier handle is either ready
/// or permanently unavailable; handlers check it before doing work.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub ocr: Arc<OcrEngine>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, ocr: OcrEngine) -> Self {
        Self {
            analyzer,
            ocr: Arc::new(ocr),
        }
    }

    /// Load the model and configure OCR from `config`.
    ///
    /// A model that fails to load does not fail startup; the state comes up
    /// with an unavailable classifier.
    pub async fn load(config: &ServerConfig) -> anyhow::Result<Self> {
        let model_dir = config.model.model_dir.clone();
        let classifier =
            tokio::task::spawn_blocking(move || ClassifierHandle::load(&model_dir)).await?;
        Ok(Self::new(
            Analyzer::new(classifier),
            OcrEngine::new(config.ocr.to_config()),
        ))
    }
}
