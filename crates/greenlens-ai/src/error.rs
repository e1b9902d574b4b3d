use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI model not ready or failed to load")]
    ModelUnavailable,

    #[error("no candidate labels given")]
    NoCandidateLabels,

    #[error("tokenizer error: {0}")]
    Tokenize(String),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Ort(#[from] ort::Error),

    #[error("unexpected model output: {0}")]
    InvalidOutput(String),

    #[error("model lock poisoned")]
    Poisoned,
}
