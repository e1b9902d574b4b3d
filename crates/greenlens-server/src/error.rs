//! API errors and their HTTP mapping.
//!
//! | Variant            | Status |
//! |--------------------|--------|
//! | `BadRequest`       | 400    |
//! | `Extraction`       | 400 (500 when the OCR tool itself is missing) |
//! | `ModelUnavailable` | 503    |
//! | `Internal`         | 500, cause logged, generic body |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use greenlens_ai::AiError;
use greenlens_extract::ExtractionError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("AI Model not ready or failed to load.")]
    ModelUnavailable,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Extraction(ExtractionError::OcrUnavailable { .. } | ExtractionError::Io(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Extraction(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::ModelUnavailable => Self::ModelUnavailable,
            other => Self::Internal(format!("classification failed: {other}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
            "Internal classification error.".to_string()
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
