//! Claim input for `greenlens classify`: inline text, a PDF, or an image.

use std::path::Path;

use anyhow::Context;
use greenlens_core::usable_text;
use greenlens_extract::{OcrEngine, extract_pdf_text};

/// How a file argument is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    /// PDFs by extension; everything else goes through OCR.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Image,
        }
    }
}

/// Resolve the claim text from either an inline string or a file.
pub async fn read_claim(
    text: Option<String>,
    file: Option<&Path>,
    ocr: &OcrEngine,
) -> anyhow::Result<String> {
    let raw = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            match FileKind::detect(path) {
                FileKind::Pdf => tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                    .await??,
                FileKind::Image => ocr.extract_text(&bytes).await?,
            }
        }
        (None, None) => anyhow::bail!("give a claim as TEXT or with --file"),
    };

    usable_text(&raw)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no usable text to classify"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_extension() {
        assert_eq!(FileKind::detect(Path::new("report.pdf")), FileKind::Pdf);
        assert_eq!(FileKind::detect(Path::new("REPORT.PDF")), FileKind::Pdf);
        assert_eq!(FileKind::detect(Path::new("label.png")), FileKind::Image);
        assert_eq!(FileKind::detect(Path::new("scan")), FileKind::Image);
    }

    #[tokio::test]
    async fn inline_text_is_trimmed() {
        let text = read_claim(Some("  eco-friendly \n".into()), None, &OcrEngine::default())
            .await
            .unwrap();
        assert_eq!(text, "eco-friendly");
    }

    #[tokio::test]
    async fn blank_text_rejected() {
        let err = read_claim(Some("   ".into()), None, &OcrEngine::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no usable text"));
    }

    #[tokio::test]
    async fn no_input_rejected() {
        assert!(read_claim(None, None, &OcrEngine::default()).await.is_err());
    }

    #[tokio::test]
    async fn invalid_pdf_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claim.pdf");
        std::fs::write(&path, b"plain text pretending to be a pdf").unwrap();
        let err = read_claim(None, Some(&path), &OcrEngine::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("PDF processing failed"));
    }
}
