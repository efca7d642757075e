use regex::Regex;
use std::sync::LazyLock;

use super::VideoId;

/// Id location patterns, tried in order: watch query, short link, embed path.
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})",
    ]
    .map(|pattern| Regex::new(pattern).expect("static video id pattern is valid"))
});

/// Check whether the URL mentions the YouTube domain or its short-link domain
pub fn supports_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Extract the video id from a YouTube URL.
///
/// The first pattern that matches wins. Ids are matched on exactly 11
/// characters from `[A-Za-z0-9_-]`.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId::from_match(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_url() {
        assert!(supports_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(supports_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(supports_url("https://m.youtube.com/"));
        assert!(!supports_url("https://twitter.com/user/status/123"));
    }

    #[test]
    fn test_extract_video_id_pattern_order() {
        // Watch form is tried before the short-link form
        let url = "https://youtube.com/watch?v=AAAAAAAAAAA#https://youtu.be/BBBBBBBBBBB";
        assert_eq!(extract_video_id(url).unwrap().as_str(), "AAAAAAAAAAA");
    }

    #[test]
    fn test_extract_video_id_takes_first_eleven_characters() {
        let id = extract_video_id("https://youtu.be/dQw4w9WgXcQextra").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_video_id_rejects_other_paths() {
        assert!(extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ").is_none());
        assert!(extract_video_id("https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ").is_none());
    }
}
