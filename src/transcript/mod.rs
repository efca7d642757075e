use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::extractors::VideoId;

pub mod youtube;

pub use youtube::YoutubeTranscriptSource;

/// A single caption segment as delivered by the transcript provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Caption text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// Failures reported by the transcript stage
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Transcripts are disabled for this video. The video creator has turned off the transcript feature.")]
    Disabled,

    #[error("No transcript available for this video. Try a video with English captions enabled.")]
    NotFound { language: String },

    #[error("Failed to fetch transcript: {0}")]
    Upstream(String),

    /// Caption data came back but could not be turned into text
    #[error("Failed to format transcript: {0}")]
    Format(String),
}

/// Source of raw caption segments for a video
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch caption segments for the video in the given language only
    async fn fetch_segments(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<CaptionSegment>, TranscriptError>;
}

/// Transcript acquisition client.
///
/// A single attempt per call, no retries. The provider's segments are
/// flattened into one plain-text transcript.
pub struct TranscriptService {
    source: Box<dyn TranscriptSource>,
    language: String,
}

impl TranscriptService {
    pub fn new(source: Box<dyn TranscriptSource>, language: impl Into<String>) -> Self {
        Self {
            source,
            language: language.into(),
        }
    }

    /// Fetch and flatten the transcript for a video
    pub async fn extract_transcript(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        tracing::info!("Fetching {} transcript for video: {}", self.language, video_id);

        let segments = self
            .source
            .fetch_segments(video_id.as_str(), &self.language)
            .await
            .map_err(|e| {
                tracing::warn!("Transcript fetch failed for {}: {}", video_id, e);
                e
            })?;

        let transcript = flatten_segments(&segments);

        tracing::info!(
            "Transcript ready for {}: {} segments, {} characters",
            video_id,
            segments.len(),
            transcript.len()
        );

        Ok(transcript)
    }
}

/// Join segment texts in their original order, one segment per line.
///
/// Blank captions flatten to blank text. Rejecting an empty transcript is the
/// generator's job.
pub fn flatten_segments(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::validate_url;

    fn segment(text: &str, start: f64) -> CaptionSegment {
        CaptionSegment {
            text: text.to_string(),
            start,
            duration: 1.5,
        }
    }

    fn video_id() -> VideoId {
        validate_url("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_flatten_segments_preserves_order() {
        let segments = vec![segment("first", 0.0), segment("second", 1.5), segment("third", 3.0)];
        assert_eq!(flatten_segments(&segments), "first\nsecond\nthird");
    }

    #[test]
    fn test_flatten_segments_keeps_blank_captions() {
        assert_eq!(flatten_segments(&[]), "");
        let blank = vec![segment("  ", 0.0), segment("", 1.0)];
        assert_eq!(flatten_segments(&blank), "  \n");
    }

    #[tokio::test]
    async fn test_extract_transcript_requests_configured_language() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_fetch_segments()
            .withf(|video_id, language| {
                video_id.to_string() == "dQw4w9WgXcQ" && language.to_string() == "en"
            })
            .times(1)
            .returning(|_, _| Ok(vec![segment("hello", 0.0), segment("world", 1.0)]));

        let service = TranscriptService::new(Box::new(source), "en");
        let transcript = service.extract_transcript(&video_id()).await.unwrap();
        assert_eq!(transcript, "hello\nworld");
    }

    #[tokio::test]
    async fn test_extract_transcript_distinguishes_disabled_from_not_found() {
        let mut disabled = MockTranscriptSource::new();
        disabled
            .expect_fetch_segments()
            .returning(|_, _| Err(TranscriptError::Disabled));
        let err = TranscriptService::new(Box::new(disabled), "en")
            .extract_transcript(&video_id())
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptError::Disabled));
        let disabled_msg = err.to_string();

        let mut missing = MockTranscriptSource::new();
        missing.expect_fetch_segments().returning(|_, language| {
            Err(TranscriptError::NotFound {
                language: language.to_string(),
            })
        });
        let err = TranscriptService::new(Box::new(missing), "en")
            .extract_transcript(&video_id())
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptError::NotFound { .. }));

        assert_ne!(disabled_msg, err.to_string());
        assert!(disabled_msg.contains("disabled"));
        assert!(err.to_string().contains("No transcript available"));
    }

    #[tokio::test]
    async fn test_extract_transcript_passes_blank_captions_through() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_fetch_segments()
            .returning(|_, _| Ok(vec![segment("   ", 0.0)]));

        let transcript = TranscriptService::new(Box::new(source), "en")
            .extract_transcript(&video_id())
            .await
            .unwrap();
        assert_eq!(transcript, "   ");
    }
}
