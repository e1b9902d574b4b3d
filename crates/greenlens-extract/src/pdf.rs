//! PDF text extraction.
//!
//! Pages are read in document order and their plain text concatenated. No
//! layout or structure is preserved.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::ExtractionError;

/// Readers accept the `%PDF-` marker anywhere in the first KiB.
const HEADER_WINDOW: usize = 1024;

/// Extract the plain text of every page of an in-memory PDF.
///
/// Returns an empty string for a valid PDF without a text layer; deciding
/// whether that is usable is up to the caller.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Pdf("empty upload".into()));
    }

    let window = &bytes[..bytes.len().min(HEADER_WINDOW)];
    if !window.windows(5).any(|w| w == b"%PDF-") {
        return Err(ExtractionError::Pdf("missing %PDF- header".into()));
    }

    // pdf-extract panics on some malformed fonts and encodings.
    let text = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }))
    .map_err(|payload| {
        let reason = panic_message(payload.as_ref());
        warn!(reason = %reason, "PDF parser panicked");
        ExtractionError::Pdf(reason)
    })?
    .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    debug!(bytes = bytes.len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAIM_PDF: &[u8] = include_bytes!("../testdata/claim.pdf");
    const BLANK_PDF: &[u8] = include_bytes!("../testdata/blank.pdf");

    #[test]
    fn page_text_extracted() {
        let text = extract_pdf_text(CLAIM_PDF).unwrap();
        assert!(
            text.contains("Our packaging is 100% recycled and carbon neutral."),
            "got {text:?}"
        );
    }

    #[test]
    fn page_without_text_gives_empty_string() {
        let text = extract_pdf_text(BLANK_PDF).unwrap();
        assert!(text.trim().is_empty(), "got {text:?}");
    }

    #[test]
    fn empty_bytes_rejected() {
        let err = extract_pdf_text(&[]).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn non_pdf_bytes_rejected() {
        let err = extract_pdf_text(b"This is a plain text file, not a PDF.").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
        assert!(err.to_string().starts_with("PDF processing failed"));
    }

    #[test]
    fn truncated_pdf_rejected() {
        let bytes = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R";
        let err = extract_pdf_text(bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn header_after_window_rejected() {
        let mut bytes = vec![b' '; HEADER_WINDOW + 10];
        bytes.extend_from_slice(b"%PDF-1.7\n");
        assert!(extract_pdf_text(&bytes).is_err());
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("bad font");
        assert_eq!(panic_message(payload.as_ref()), "bad font");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bad cmap"));
        assert_eq!(panic_message(payload.as_ref()), "bad cmap");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "parser panicked");
    }
}
