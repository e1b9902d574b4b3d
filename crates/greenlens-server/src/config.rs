//! Command-line and environment configuration.
//!
//! Every setting has a flag, an environment variable, and a default, so the
//! server runs unconfigured on a machine with `tesseract` on `PATH` and the
//! model under `models/`.

use std::path::PathBuf;

use clap::Args;
use greenlens_extract::OcrConfig;

/// Where the NLI model lives.
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Directory containing model.onnx, tokenizer.json and config.json.
    #[arg(
        long,
        env = "GREENLENS_MODEL_DIR",
        default_value = "models/distilbert-base-uncased-mnli"
    )]
    pub model_dir: PathBuf,
}

/// Tesseract settings.
#[derive(Debug, Clone, Args)]
pub struct OcrArgs {
    /// Tesseract executable name or path.
    #[arg(long, env = "GREENLENS_TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: PathBuf,

    /// Tesseract language data directory.
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_prefix: Option<PathBuf>,

    /// OCR language code.
    #[arg(long, env = "GREENLENS_OCR_LANG", default_value = "eng")]
    pub ocr_lang: String,
}

impl OcrArgs {
    pub fn to_config(&self) -> OcrConfig {
        OcrConfig {
            tesseract_cmd: self.tesseract_cmd.clone(),
            tessdata_prefix: self.tessdata_prefix.clone(),
            language: self.ocr_lang.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "GREENLENS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "GREENLENS_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "GREENLENS_MAX_UPLOAD_BYTES", default_value_t = 25 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub ocr: OcrArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn defaults() {
        let cli = TestCli::try_parse_from(["greenlens"]).unwrap();
        let config = cli.server;
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(
            config.model.model_dir,
            PathBuf::from("models/distilbert-base-uncased-mnli")
        );
        assert_eq!(config.ocr.ocr_lang, "eng");
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "greenlens",
            "--port",
            "9100",
            "--tesseract-cmd",
            "/opt/tesseract/bin/tesseract",
            "--tessdata-prefix",
            "/opt/tesseract/share/tessdata",
        ])
        .unwrap();
        assert_eq!(cli.server.port, 9100);

        let ocr = cli.server.ocr.to_config();
        assert_eq!(ocr.tesseract_cmd, PathBuf::from("/opt/tesseract/bin/tesseract"));
        assert_eq!(
            ocr.tessdata_prefix,
            Some(PathBuf::from("/opt/tesseract/share/tessdata"))
        );
        assert_eq!(ocr.language, "eng");
    }
}
