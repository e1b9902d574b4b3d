//! Text extraction: PDF parsing (pdf-extract) and image OCR (Tesseract CLI).

mod error;
pub use error::ExtractionError;

mod ocr;
pub use ocr::{OcrConfig, OcrEngine};

mod pdf;
pub use pdf::extract_pdf_text;
