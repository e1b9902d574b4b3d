//! Route table and handlers.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use greenlens_core::{
    ClassificationResult, HealthStatus, MODEL_ID, SERVICE_NAME, TextClaim, usable_text,
};
use greenlens_extract::extract_pdf_text;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{ApiError, AppState};

/// Build the API router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/classify-text", post(classify_text))
        .route("/api/classify-file", post(classify_file))
        .route("/api/classify-image", post(classify_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        model: MODEL_ID.to_string(),
        model_ready: state.analyzer.is_ready(),
    })
}

async fn classify_text(
    State(state): State<AppState>,
    Json(claim): Json<TextClaim>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let text = usable_text(&claim.text)
        .ok_or_else(|| ApiError::bad_request("Text must not be empty."))?
        .to_string();
    ensure_ready(&state)?;
    analyze(&state, text).await
}

async fn classify_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassificationResult>, ApiError> {
    let upload = read_upload(multipart).await?;
    if !upload.content_type_is(|ct| ct == "application/pdf") {
        return Err(ApiError::bad_request("Only PDF files are accepted."));
    }
    ensure_ready(&state)?;

    info!(file = upload.file_name.as_deref().unwrap_or("-"), bytes = upload.bytes.len(), "classifying PDF");
    let bytes = upload.bytes;
    let extracted = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("PDF task failed: {e}")))??;

    let text = usable_text(&extracted)
        .ok_or_else(|| ApiError::bad_request("PDF contained no usable text."))?
        .to_string();
    analyze(&state, text).await
}

async fn classify_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassificationResult>, ApiError> {
    let upload = read_upload(multipart).await?;
    if !upload.content_type_is(|ct| ct.starts_with("image/")) {
        return Err(ApiError::bad_request("File is not an image."));
    }
    ensure_ready(&state)?;

    info!(file = upload.file_name.as_deref().unwrap_or("-"), bytes = upload.bytes.len(), "classifying image");
    let extracted = state.ocr.extract_text(&upload.bytes).await?;

    let text = usable_text(&extracted)
        .ok_or_else(|| ApiError::bad_request("No text could be extracted from the image."))?
        .to_string();
    analyze(&state, text).await
}

fn ensure_ready(state: &AppState) -> Result<(), ApiError> {
    if state.analyzer.is_ready() {
        Ok(())
    } else {
        Err(ApiError::ModelUnavailable)
    }
}

/// Run the analyzer on the blocking pool; inference is CPU-bound.
async fn analyze(state: &AppState, text: String) -> Result<Json<ClassificationResult>, ApiError> {
    let analyzer = state.analyzer.clone();
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&text))
        .await
        .map_err(|e| ApiError::Internal(format!("classification task failed: {e}")))??;
    info!(prediction = %result.prediction, confidence = result.confidence, "classified");
    Ok(Json(result))
}

/// The `file` field of a multipart upload.
struct Upload {
    content_type: Option<String>,
    file_name: Option<String>,
    bytes: Bytes,
}

impl Upload {
    /// Test the media type, ignoring parameters and case.
    fn content_type_is(&self, accept: impl Fn(&str) -> bool) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|essence| accept(&essence.trim().to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Could not read upload: {e}")))?;
        return Ok(Upload {
            content_type,
            file_name,
            bytes,
        });
    }
    Err(ApiError::bad_request("Missing multipart field 'file'."))
}
