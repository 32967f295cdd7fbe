use std::sync::OnceLock;

static VIDEO_URL_REGEX: OnceLock<regex::Regex> = OnceLock::new();

/// Whether a string looks like a YouTube video URL. Accepts the two canonical
/// hosts with optional scheme and optional www prefix: watch?v=, embed/ and
/// v/ paths on youtube.com, plus youtu.be short links.
pub fn is_video_url(url: &str) -> bool {
    let regex = VIDEO_URL_REGEX.get_or_init(|| {
        regex::Regex::new(r"^(https?://)?(www\.)?(youtube\.com/(watch\?v=|embed/|v/)|youtu\.be/)")
            .unwrap()
    });
    regex.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_watch_urls() {
        assert!(is_video_url("https://www.youtube.com/watch?v=abc123"));
        assert!(is_video_url("http://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_video_url("www.youtube.com/watch?v=abc123"));
        assert!(is_video_url("youtube.com/watch?v=abc123"));
    }

    #[test]
    fn test_accepts_embed_and_v_urls() {
        assert!(is_video_url("https://www.youtube.com/embed/abc123"));
        assert!(is_video_url("youtube.com/embed/abc123"));
        assert!(is_video_url("https://youtube.com/v/abc123"));
    }

    #[test]
    fn test_accepts_short_links() {
        assert!(is_video_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_video_url("youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert!(!is_video_url("https://notyoutube.com/x"));
        assert!(!is_video_url("https://vimeo.com/12345"));
        assert!(!is_video_url("https://m.youtube.com/watch?v=abc123"));
        assert!(!is_video_url("https://youtube.org/watch?v=abc123"));
    }

    #[test]
    fn test_rejects_other_paths_and_schemes() {
        assert!(!is_video_url("https://www.youtube.com/playlist?list=abc"));
        assert!(!is_video_url("https://www.youtube.com/channel/UCabc"));
        assert!(!is_video_url("ftp://youtube.com/watch?v=abc123"));
    }

    #[test]
    fn test_rejects_non_urls() {
        assert!(!is_video_url(""));
        assert!(!is_video_url("not a url"));
        assert!(!is_video_url("watch?v=abc123"));
    }

    #[test]
    fn test_is_pure_on_surrounding_whitespace() {
        // Callers trim before validating; leading whitespace is not a URL.
        assert!(!is_video_url("  https://youtu.be/abc123"));
    }
}
