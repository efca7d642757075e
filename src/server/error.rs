use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::generator::GenerationError;
use crate::transcript::TranscriptError;

const INVALID_URL_DETAIL: &str = "Please provide a valid YouTube URL. \
Supported formats: youtube.com/watch?v=..., youtu.be/..., youtube.com/embed/...";

/// Body of every 4xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

/// Failures surfaced by the HTTP handlers
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {detail}")]
    InvalidRequest { status: StatusCode, detail: String },

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { status, .. } => *status,
            ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::Transcript(_) | ApiError::Generation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, detail) = match self {
            ApiError::InvalidRequest { detail, .. } => ("Invalid Request", detail.clone()),
            ApiError::InvalidUrl => ("Invalid YouTube URL", INVALID_URL_DETAIL.to_string()),
            ApiError::Transcript(e) => ("Transcript Extraction Failed", e.to_string()),
            ApiError::Generation(e) => ("Content Generation Failed", e.to_string()),
        };

        ErrorBody {
            error: error.to_string(),
            detail,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), "Request failed: {}", self);
        (status, Json(self.body())).into_response()
    }
}
