use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::digest::{Digest, DigestKind};

#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct NewsRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub source_url: String,
    pub kind: DigestKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub summary: String,
    pub word_count: usize,
    pub summarized_at: DateTime<Utc>,
}

impl From<Digest> for SummaryResponse {
    fn from(digest: Digest) -> Self {
        SummaryResponse {
            source_url: digest.source_url,
            kind: digest.kind,
            video_id: digest.video_id,
            summary: digest.summary,
            word_count: digest.word_count,
            summarized_at: Utc::now(),
        }
    }
}
