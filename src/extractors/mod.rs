use serde::{Serialize, Serializer};
use std::fmt;

pub mod youtube;

/// Length of every YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

/// A validated 11-character YouTube video identifier.
///
/// Only constructed by [`validate_url`], so holding one means the id came
/// out of a recognised URL shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    fn from_match(id: &str) -> Self {
        debug_assert_eq!(id.len(), VIDEO_ID_LEN);
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for VideoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Validate a user-supplied URL and extract its video id.
///
/// Returns `None` when the URL does not mention a YouTube domain or when no
/// supported URL shape yields a well-formed id.
pub fn validate_url(url: &str) -> Option<VideoId> {
    if !youtube::supports_url(url) {
        tracing::debug!("Rejected URL without a YouTube domain: {}", url);
        return None;
    }

    let id = youtube::extract_video_id(url);
    if id.is_none() {
        tracing::debug!("No video id found in URL: {}", url);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_supported_shapes() {
        let cases = [
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://youtube.com/watch?v=dQw4w9WgXcQ&t=42s", "dQw4w9WgXcQ"),
            ("youtube.com/watch?v=a_b-C1d2E3f", "a_b-C1d2E3f"),
            ("https://youtu.be/dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://youtu.be/dQw4w9WgXcQ?feature=shared", "dQw4w9WgXcQ"),
            ("https://www.youtube.com/embed/dQw4w9WgXcQ", "dQw4w9WgXcQ"),
        ];

        for (url, expected) in cases {
            let id = validate_url(url).unwrap_or_else(|| panic!("{} should be valid", url));
            assert_eq!(id.as_str(), expected, "url: {}", url);
        }
    }

    #[test]
    fn test_validate_url_rejects_foreign_domains() {
        assert!(validate_url("https://vimeo.com/watch?v=dQw4w9WgXcQ").is_none());
        assert!(validate_url("https://example.com/embed/dQw4w9WgXcQ").is_none());
        assert!(validate_url("dQw4w9WgXcQ").is_none());
        assert!(validate_url("").is_none());
    }

    #[test]
    fn test_validate_url_rejects_youtube_without_id() {
        assert!(validate_url("https://www.youtube.com/").is_none());
        assert!(validate_url("https://www.youtube.com/watch?v=short").is_none());
        assert!(validate_url("https://youtu.be/").is_none());
        assert!(validate_url("https://www.youtube.com/channel/UC1234567890").is_none());
    }

    #[test]
    fn test_video_id_serializes_as_plain_string() {
        let id = validate_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dQw4w9WgXcQ\"");
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
    }
}
