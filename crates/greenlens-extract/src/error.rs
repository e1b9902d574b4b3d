use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF processing failed: {0}")]
    Pdf(String),

    #[error("image could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR tool {cmd:?} could not be started: {source}")]
    OcrUnavailable {
        cmd: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
