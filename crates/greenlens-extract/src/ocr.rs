//! Optical character recognition through the Tesseract command-line tool.
//!
//! Uploaded bytes are decoded with the `image` crate first, so anything that
//! is not a readable image fails before a process is spawned. The decoded
//! image is re-encoded as PNG and piped to `tesseract stdin stdout`.

use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;

use image::ImageFormat;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::ExtractionError;

/// Tesseract invocation settings.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Executable name or path.
    pub tesseract_cmd: PathBuf,
    /// Exported as `TESSDATA_PREFIX` when set.
    pub tessdata_prefix: Option<PathBuf>,
    /// Tesseract language code.
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            tessdata_prefix: None,
            language: "eng".to_string(),
        }
    }
}

/// Stateless OCR front end; cheap to share between requests.
#[derive(Debug, Clone, Default)]
pub struct OcrEngine {
    config: OcrConfig,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        info!(
            cmd = %config.tesseract_cmd.display(),
            language = %config.language,
            "configured OCR"
        );
        Self { config }
    }

    /// Recognize the text in an encoded image (PNG, JPEG, WebP, ...).
    ///
    /// Returns whatever Tesseract printed, which may be blank when the image
    /// holds no text.
    pub async fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let png = normalize_to_png(bytes)?;
        self.run_tesseract(&png).await
    }

    async fn run_tesseract(&self, png: &[u8]) -> Result<String, ExtractionError> {
        let mut command = Command::new(&self.config.tesseract_cmd);
        command
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(prefix) = &self.config.tessdata_prefix {
            command.env("TESSDATA_PREFIX", prefix);
        }

        let mut child = command
            .spawn()
            .map_err(|source| ExtractionError::OcrUnavailable {
                cmd: self.config.tesseract_cmd.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A tool that exits early closes the pipe; its exit status says why.
            if let Err(e) = stdin.write_all(png).await
                && e.kind() != std::io::ErrorKind::BrokenPipe
            {
                return Err(e.into());
            }
            // Closing stdin signals end of image.
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "OCR complete");
        Ok(text)
    }
}

/// Decode `bytes` as any supported image format and re-encode it as PNG.
fn normalize_to_png(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let image = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    debug!(
        width = image.width(),
        height = image.height(),
        "decoded image for OCR"
    );
    Ok(png)
}
