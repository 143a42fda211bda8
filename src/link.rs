//! Input URL validation and YouTube link handling.
//!
//! A link is treated as YouTube content when its host mentions `youtu.be` or
//! `youtube`; everything else goes through the generic page loader.

use url::Url;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    YouTube,
    Web,
}

/// Validates raw user input as an absolute http(s) URL with a host.
pub fn parse_input(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("Please provide a URL.".to_string()));
    }

    let invalid = || AppError::Validation("Please enter a valid URL (YouTube or website).".to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

pub fn classify(url: &Url) -> LinkKind {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if host.contains("youtu.be") || host.contains("youtube") {
        LinkKind::YouTube
    } else {
        LinkKind::Web
    }
}

/// Derives the video id from the youtu.be, watch, and shorts URL shapes,
/// falling back to a `v` query parameter on any other path.
pub fn extract_video_id(url: &Url) -> Result<String> {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let path = url.path();

    let candidate = if host == "youtu.be" || host == "www.youtu.be" {
        Some(path.trim_start_matches('/').to_string())
    } else if path == "/watch" {
        query_param(url, "v")
    } else if path.starts_with("/shorts/") {
        path.split('/')
            .nth(2)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .or_else(|| query_param(url, "v"))
    } else {
        query_param(url, "v")
    };

    candidate
        .filter(|id| !id.trim().is_empty())
        .ok_or(AppError::UnsupportedUrl)
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    fn video_id(raw: &str) -> Result<String> {
        extract_video_id(&url(raw))
    }

    #[test]
    fn short_links_yield_the_path() {
        assert_eq!(video_id("https://youtu.be/abc123").unwrap(), "abc123");
        assert_eq!(video_id("https://www.youtu.be/dQw4w9WgXcQ?t=42").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(video_id("https://YOUTU.BE/Mixed_Case-1").unwrap(), "Mixed_Case-1");
    }

    #[test]
    fn watch_links_yield_the_v_parameter() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=xyz789&t=30s").unwrap(),
            "xyz789"
        );
        assert_eq!(
            video_id("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn shorts_links_yield_the_second_segment() {
        assert_eq!(video_id("https://www.youtube.com/shorts/sh0rt1d").unwrap(), "sh0rt1d");
        assert_eq!(
            video_id("https://youtube.com/shorts/sh0rt1d/extra?feature=share").unwrap(),
            "sh0rt1d"
        );
    }

    #[test]
    fn other_paths_fall_back_to_v() {
        assert_eq!(
            video_id("https://www.youtube.com/embed/ignored?v=fromquery").unwrap(),
            "fromquery"
        );
    }

    #[test]
    fn unrecognised_shapes_are_unsupported() {
        assert!(matches!(
            video_id("https://www.youtube.com/channel/UCxyz"),
            Err(AppError::UnsupportedUrl)
        ));
        assert!(matches!(
            video_id("https://www.youtube.com/watch?list=PL123"),
            Err(AppError::UnsupportedUrl)
        ));
        assert!(matches!(video_id("https://www.youtube.com/watch?v="), Err(AppError::UnsupportedUrl)));
        assert!(matches!(video_id("https://youtu.be/"), Err(AppError::UnsupportedUrl)));
    }

    #[test]
    fn classification_looks_at_the_host_only() {
        assert_eq!(classify(&url("https://youtu.be/abc123")), LinkKind::YouTube);
        assert_eq!(classify(&url("https://www.YouTube.com/watch?v=a")), LinkKind::YouTube);
        assert_eq!(classify(&url("https://music.youtube.com/watch?v=a")), LinkKind::YouTube);
        assert_eq!(classify(&url("https://example.com/article")), LinkKind::Web);
        assert_eq!(
            classify(&url("https://example.com/why-youtube-won")),
            LinkKind::Web
        );
    }

    #[test]
    fn input_must_be_an_absolute_http_url() {
        assert!(parse_input("  https://example.com/article ").is_ok());
        assert!(matches!(parse_input(""), Err(AppError::Validation(_))));
        assert!(matches!(parse_input("   "), Err(AppError::Validation(_))));
        assert!(matches!(parse_input("not a url"), Err(AppError::Validation(_))));
        assert!(matches!(parse_input("ftp://example.com/file"), Err(AppError::Validation(_))));
        assert!(matches!(parse_input("mailto:someone@example.com"), Err(AppError::Validation(_))));
    }
}
