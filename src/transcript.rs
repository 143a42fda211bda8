//! YouTube transcript retrieval.
//!
//! The watch page embeds a `ytInitialPlayerResponse` object listing the
//! caption tracks; the chosen track's `baseUrl` serves the timed text as XML.

use std::fmt::Display;

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::document::ContentDocument;
use crate::error::{AppError, Result};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },
    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),
    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Malformed transcript data: {0}")]
    Parse(String),
}

impl From<TranscriptError> for AppError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::Request(e) => AppError::FetchError(e.to_string()),
            TranscriptError::Parse(msg) => AppError::ParseError(msg),
            other => AppError::TranscriptUnavailable(other.to_string()),
        }
    }
}

/// Source of timed transcript segments for a video.
///
/// `languages: None` means any available transcript is acceptable.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(
        &self,
        video_id: &str,
        languages: Option<&[String]>,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError>;
}

pub struct YouTubeTranscripts {
    client: Client,
    base_url: String,
}

impl YouTubeTranscripts {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: YOUTUBE_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
    }

    async fn get_text(request: RequestBuilder) -> std::result::Result<String, TranscriptError> {
        let text = request
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn fetch(
        &self,
        video_id: &str,
        languages: Option<&[String]>,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
        let watch_url = format!("{}/watch", self.base_url.trim_end_matches('/'));
        debug!(%watch_url, video_id, "Fetching watch page");
        let html = Self::get_text(self.get(&watch_url).query(&[("v", video_id)])).await?;

        let player = extract_player_response(&html)?
            .ok_or_else(|| TranscriptError::VideoUnavailable(video_id.to_string()))?;

        if let Some(status) = &player.playability_status {
            if status.status != "OK" {
                warn!(
                    video_id,
                    status = %status.status,
                    reason = status.reason.as_deref().unwrap_or(""),
                    "Video is not playable"
                );
                return Err(TranscriptError::VideoUnavailable(video_id.to_string()));
            }
        }

        let tracks = player
            .captions
            .and_then(|c| c.tracklist)
            .map(|t| t.caption_tracks)
            .unwrap_or_default();
        if tracks.is_empty() {
            return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
        }

        let track = select_track(&tracks, languages).ok_or_else(|| {
            TranscriptError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.map(<[String]>::to_vec).unwrap_or_default(),
            }
        })?;
        debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let xml = Self::get_text(self.get(&track.base_url)).await?;
        parse_timed_text(&xml)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<Tracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// `Ok(None)` when the page carries no player response at all.
fn extract_player_response(
    html: &str,
) -> std::result::Result<Option<PlayerResponse>, TranscriptError> {
    let Some(start) = html.find(PLAYER_RESPONSE_MARKER) else {
        return Ok(None);
    };
    serde_json::Deserializer::from_str(&html[start + PLAYER_RESPONSE_MARKER.len()..])
        .into_iter::<PlayerResponse>()
        .next()
        .transpose()
        .map_err(|e| TranscriptError::Parse(format!("player response: {e}")))
}

/// Manually created tracks win over generated ones for the same language;
/// languages are tried in the order given.
fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: Option<&[String]>,
) -> Option<&'a CaptionTrack> {
    match languages {
        Some(languages) => languages.iter().find_map(|lang| {
            tracks
                .iter()
                .find(|t| !t.is_generated() && &t.language_code == lang)
                .or_else(|| tracks.iter().find(|t| t.is_generated() && &t.language_code == lang))
        }),
        None => tracks
            .iter()
            .find(|t| !t.is_generated())
            .or_else(|| tracks.first()),
    }
}

fn malformed(err: impl Display) -> TranscriptError {
    TranscriptError::Parse(format!("timed text: {err}"))
}

/// Reads every `<text start dur>` element of a timedtext document. A
/// self-closing element is kept as an empty segment.
fn parse_timed_text(xml: &str) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<TranscriptSegment> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) if e.name().as_ref() == b"text" => {
                current = Some(open_segment(&e)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"text" => {
                segments.push(open_segment(&e)?);
            }
            Event::Text(t) => {
                if let Some(segment) = current.as_mut() {
                    segment.text.push_str(&t.unescape().map_err(malformed)?);
                }
            }
            Event::End(e) if e.name().as_ref() == b"text" => {
                if let Some(mut segment) = current.take() {
                    segment.text = clean_caption(&segment.text);
                    segments.push(segment);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(segments)
}

fn open_segment(element: &BytesStart) -> std::result::Result<TranscriptSegment, TranscriptError> {
    let seconds = |name: &str| -> std::result::Result<f64, TranscriptError> {
        let value = element
            .try_get_attribute(name)
            .map_err(malformed)?
            .and_then(|attr| attr.unescape_value().ok().and_then(|v| v.parse::<f64>().ok()));
        Ok(value.unwrap_or_default())
    };

    Ok(TranscriptSegment {
        text: String::new(),
        start: seconds("start")?,
        duration: seconds("dur")?,
    })
}

// After the XML layer is unescaped, caption text can still carry `<font>`
// markup and a second layer of HTML entities (`&#39;`).
fn clean_caption(text: &str) -> String {
    let stripped = strip_font_markup(text);
    html_escape::decode_html_entities(&stripped).into_owned()
}

fn strip_font_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let is_font = (tail.starts_with("<font") && tail[5..].starts_with([' ', '>']))
            || tail.starts_with("</font>");
        match tail.find('>') {
            Some(end) if is_font => rest = &tail[end + 1..],
            _ => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Joins non-empty segment texts with single spaces.
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetches the transcript for `video_id`, retrying once without a language
/// restriction when none of `languages` has a transcript.
pub async fn acquire_transcript(
    source: &dyn TranscriptSource,
    video_id: &str,
    source_url: &str,
    languages: &[String],
) -> Result<ContentDocument> {
    let segments = match source.fetch(video_id, Some(languages)).await {
        Ok(segments) => segments,
        Err(TranscriptError::NoTranscriptFound { .. }) => {
            info!(video_id, ?languages, "No transcript in preferred languages, trying any language");
            source.fetch(video_id, None).await?
        }
        Err(e) => {
            warn!(video_id, error = %e, "Transcript unavailable");
            return Err(e.into());
        }
    };

    let text = join_segments(&segments);
    if text.trim().is_empty() {
        return Err(AppError::EmptyTranscript);
    }

    info!(video_id, segments = segments.len(), chars = text.len(), "Transcript acquired");
    Ok(ContentDocument::new(text, source_url))
}
