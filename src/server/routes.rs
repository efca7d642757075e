use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::extractors::{self, VideoId};
use crate::generator::LearningPackage;

/// Body of both POST endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUrlRequest {
    pub youtube_url: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub video_id: VideoId,
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessVideoResponse {
    pub video_id: VideoId,
    pub transcript: String,
    #[serde(flatten)]
    pub package: LearningPackage,
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "Backend running successfully",
        "environment": state.config.app.environment.as_str(),
        "version": state.config.app.version,
        "message": format!("{} is active", state.config.app.name),
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "environment": state.config.app.environment.as_str(),
    }))
}

pub async fn transcript_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "transcript_extraction",
        "message": "Transcript extraction service is operational",
    }))
}

pub async fn video_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let ai_status = if state.config.ai_configured() {
        "operational"
    } else {
        "not_configured"
    };

    Json(json!({
        "status": "healthy",
        "service": "video_processing",
        "components": {
            "transcript_extraction": "operational",
            "ai_generation": ai_status,
        },
    }))
}

/// `POST /api/transcript/extract`
pub async fn extract_transcript(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VideoUrlRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Json(request) = payload?;
    let span = tracing::info_span!("extract_transcript", request_id = %Uuid::new_v4());

    run_extract(&state, &request.youtube_url)
        .instrument(span)
        .await
        .map(Json)
}

/// `POST /api/video/process`
pub async fn process_video(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VideoUrlRequest>, JsonRejection>,
) -> Result<Json<ProcessVideoResponse>, ApiError> {
    let Json(request) = payload?;
    let span = tracing::info_span!("process_video", request_id = %Uuid::new_v4());

    run_process(&state, &request.youtube_url)
        .instrument(span)
        .await
        .map(Json)
}

async fn run_extract(state: &AppState, youtube_url: &str) -> Result<TranscriptResponse, ApiError> {
    let video_id = extractors::validate_url(youtube_url).ok_or(ApiError::InvalidUrl)?;
    let transcript = state.transcripts.extract_transcript(&video_id).await?;

    Ok(TranscriptResponse {
        video_id,
        transcript,
    })
}

async fn run_process(state: &AppState, youtube_url: &str) -> Result<ProcessVideoResponse, ApiError> {
    let video_id = extractors::validate_url(youtube_url).ok_or(ApiError::InvalidUrl)?;
    tracing::info!("Processing video {}", video_id);

    let transcript = state.transcripts.extract_transcript(&video_id).await?;
    let package = state.generator.generate_learning_package(&transcript).await?;

    tracing::info!("Finished processing video {}", video_id);
    Ok(ProcessVideoResponse {
        video_id,
        transcript,
        package,
    })
}
