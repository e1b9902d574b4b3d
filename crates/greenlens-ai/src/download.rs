//! HuggingFace hub client for fetching the ONNX export of the NLI model.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// ONNX export of `typeform/distilbert-base-uncased-mnli`.
pub const DEFAULT_REPO: &str = "Xenova/distilbert-base-uncased-mnli";

pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";

/// `(path in the hub repo, file name in the model directory)`.
pub const MODEL_FILES: &[(&str, &str)] = &[
    ("onnx/model.onnx", "model.onnx"),
    ("tokenizer.json", "tokenizer.json"),
    ("config.json", "config.json"),
];

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Server { status: u16, url: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads model files from a HuggingFace-compatible hub.
pub struct ModelDownloader {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ModelDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_URL.to_string())
    }
}

impl ModelDownloader {
    /// `base_url` should be like `https://huggingface.co` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of `path` on the `main` revision of `repo`.
    pub fn file_url(&self, repo: &str, path: &str) -> String {
        format!("{}/{}/resolve/main/{}", self.base_url, repo.trim_matches('/'), path)
    }

    /// Fetch every file in [`MODEL_FILES`] from `repo` into `dest`.
    ///
    /// Files already present are kept. Returns the paths written.
    pub async fn fetch_model(&self, repo: &str, dest: &Path) -> Result<Vec<PathBuf>, DownloadError> {
        tokio::fs::create_dir_all(dest).await?;

        let mut written = Vec::new();
        for (remote, local) in MODEL_FILES {
            let target = dest.join(local);
            if tokio::fs::try_exists(&target).await? {
                info!(file = %target.display(), "already present, skipping");
                continue;
            }
            let bytes = self.fetch_file(&self.file_url(repo, remote), &target).await?;
            info!(file = %target.display(), bytes, "downloaded");
            written.push(target);
        }
        Ok(written)
    }

    /// Stream one file to `target` through a `.part` file.
    async fn fetch_file(&self, url: &str, target: &Path) -> Result<u64, DownloadError> {
        info!(url = %url, "downloading model file");
        let mut resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DownloadError::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let partial = target.with_extension("part");
        commit_partial(&partial, target, async {
            let mut file = tokio::fs::File::create(&partial).await?;
            let mut total = 0u64;
            while let Some(chunk) = resp.chunk().await? {
                file.write_all(&chunk).await?;
                total += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<_, DownloadError>(total)
        })
        .await
    }
}

/// Run `write` (which fills `partial`), then move `partial` onto `target`.
///
/// On any failure `partial` is removed so an interrupted download never
/// leaves a stray file next to the model.
async fn commit_partial<F>(partial: &Path, target: &Path, write: F) -> Result<u64, DownloadError>
where
    F: Future<Output = Result<u64, DownloadError>>,
{
    let result = match write.await {
        Ok(total) => tokio::fs::rename(partial, target)
            .await
            .map(|()| total)
            .map_err(DownloadError::from),
        Err(e) => Err(e),
    };
    if result.is_err()
        && let Err(e) = tokio::fs::remove_file(partial).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(file = %partial.display(), error = %e, "could not remove partial download");
    }
    result
}
