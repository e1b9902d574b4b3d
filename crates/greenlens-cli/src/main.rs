mod display;
mod input;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use greenlens_ai::download::{DEFAULT_REPO, ModelDownloader};
use greenlens_ai::{Analyzer, ClassifierHandle};
use greenlens_extract::OcrEngine;
use greenlens_server::{AppState, ModelArgs, OcrArgs, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "greenlens", version, about = "Detect greenwashing in sustainability claims")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve(ServerConfig),

    /// Classify a single claim and print the report.
    Classify {
        /// Claim text.
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read the claim from a PDF or an image instead.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the JSON response body instead of a report.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Fetch the ONNX model files from the HuggingFace hub.
    DownloadModel {
        /// Hub repository holding the ONNX export.
        #[arg(long, default_value = DEFAULT_REPO)]
        repo: String,

        /// Destination directory.
        #[arg(long, default_value = "models/distilbert-base-uncased-mnli")]
        dest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("greenlens v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Serve(config) => {
            let state = AppState::load(&config).await?;
            if !state.analyzer.is_ready() {
                tracing::warn!("serving without a model, classification endpoints will return 503");
            }
            greenlens_server::serve(&config, state).await
        }
        Command::Classify {
            text,
            file,
            json,
            model,
            ocr,
        } => classify(text, file, json, model, ocr).await,
        Command::DownloadModel { repo, dest } => {
            let written = ModelDownloader::default()
                .fetch_model(&repo, &dest)
                .await
                .with_context(|| format!("downloading {repo}"))?;
            eprintln!(
                "  {} file(s) written to {}",
                written.len(),
                dest.display()
            );
            Ok(())
        }
    }
}

async fn classify(
    text: Option<String>,
    file: Option<PathBuf>,
    json: bool,
    model: ModelArgs,
    ocr: OcrArgs,
) -> anyhow::Result<()> {
    let ocr = OcrEngine::new(ocr.to_config());
    let claim = input::read_claim(text, file.as_deref(), &ocr).await?;

    let model_dir = model.model_dir;
    let dir = model_dir.clone();
    let classifier = tokio::task::spawn_blocking(move || ClassifierHandle::load(&dir)).await?;
    anyhow::ensure!(
        classifier.is_ready(),
        "model not available in {}; run `greenlens download-model`",
        model_dir.display()
    );

    let analyzer = Analyzer::new(classifier);
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&claim))
        .await?
        .context("classifying claim")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_report(&result);
    }
    Ok(())
}
