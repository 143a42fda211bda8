//! The two user actions: summarize a pasted URL, and summarize the news
//! homepage. Each runs validate → acquire → summarize and either returns the
//! whole result or an error.

use serde::Serialize;
use tracing::{info, instrument};

use crate::document::ContentDocument;
use crate::error::{AppError, Result};
use crate::link::{self, LinkKind};
use crate::transcript::acquire_transcript;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    Youtube,
    Web,
    News,
}

impl From<LinkKind> for DigestKind {
    fn from(kind: LinkKind) -> Self {
        match kind {
            LinkKind::YouTube => DigestKind::Youtube,
            LinkKind::Web => DigestKind::Web,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Digest {
    pub source_url: String,
    pub kind: DigestKind,
    pub video_id: Option<String>,
    pub summary: String,
    pub word_count: usize,
}

/// A non-blank key typed by the user wins over the configured one.
pub fn resolve_api_key(user_key: Option<&str>, configured: Option<&str>) -> Option<String> {
    user_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .or_else(|| configured.map(str::trim).filter(|key| !key.is_empty()))
        .map(str::to_string)
}

fn require_api_key(state: &AppState, user_key: Option<&str>) -> Result<String> {
    resolve_api_key(user_key, state.config.groq_api_key.as_deref()).ok_or_else(|| {
        AppError::Validation(
            "Please provide the Groq API Key or set GROQ_API_KEY on the server.".to_string(),
        )
    })
}

#[instrument(skip(state, raw_url, user_key), fields(url = %raw_url))]
pub async fn summarize_url(state: &AppState, raw_url: &str, user_key: Option<&str>) -> Result<Digest> {
    let api_key = require_api_key(state, user_key)?;
    let url = link::parse_input(raw_url)?;
    let kind = link::classify(&url);

    let (doc, video_id) = match kind {
        LinkKind::YouTube => {
            let video_id = link::extract_video_id(&url)?;
            info!(%video_id, "Loading YouTube transcript");
            let doc = acquire_transcript(
                state.transcripts.as_ref(),
                &video_id,
                url.as_str(),
                &state.config.transcript_languages,
            )
            .await?;
            (doc, Some(video_id))
        }
        LinkKind::Web => {
            info!("Loading web page");
            (state.pages.load(url.as_str()).await?, None)
        }
    };

    summarize(state, &api_key, doc, kind.into(), video_id).await
}

#[instrument(skip_all)]
pub async fn read_news(state: &AppState, user_key: Option<&str>) -> Result<Digest> {
    let api_key = require_api_key(state, user_key)?;
    info!(url = %state.config.news_url, "Loading news homepage");
    let doc = state.pages.load(&state.config.news_url).await?;
    summarize(state, &api_key, doc, DigestKind::News, None).await
}

async fn summarize(
    state: &AppState,
    api_key: &str,
    doc: ContentDocument,
    kind: DigestKind,
    video_id: Option<String>,
) -> Result<Digest> {
    let word_count = doc.word_count();
    let llm_start = std::time::Instant::now();
    let summary = state
        .summarizers
        .for_key(api_key)
        .summarize(std::slice::from_ref(&doc))
        .await?;
    info!(elapsed = ?llm_start.elapsed(), word_count, "Summary produced");

    Ok(Digest {
        source_url: doc.source,
        kind,
        video_id,
        summary: summary.trim().to_string(),
        word_count,
    })
}
