use anyhow::Result;
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use super::{CaptionSegment, TranscriptError, TranscriptSource};

/// Caption source backed by YouTube's public transcript endpoints
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YoutubeTranscriptSource {
    /// Create a source without cookies or proxy configuration
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow::anyhow!("Failed to initialise YouTube transcript client: {}", e))?;

        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch_segments(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<CaptionSegment>, TranscriptError> {
        tracing::debug!("Requesting captions for {} in '{}'", video_id, language);

        let fetched = self
            .api
            .fetch_transcript(video_id, &[language], false)
            .await
            .map_err(|e| classify_error(e, language))?;

        Ok(fetched
            .snippets
            .into_iter()
            .map(|snippet| CaptionSegment {
                text: snippet.text,
                start: snippet.start,
                duration: snippet.duration,
            })
            .collect())
    }
}

fn classify_error(error: CouldNotRetrieveTranscript, language: &str) -> TranscriptError {
    match &error.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => TranscriptError::Disabled,
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            TranscriptError::NotFound {
                language: language.to_string(),
            }
        }
        Some(CouldNotRetrieveTranscriptReason::YouTubeDataUnparsable(detail)) => {
            TranscriptError::Format(detail.clone())
        }
        _ => TranscriptError::Upstream(error.to_string()),
    }
}
