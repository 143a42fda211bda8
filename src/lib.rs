pub mod api;
pub mod config;
pub mod digest;
pub mod document;
pub mod error;
pub mod link;
pub mod llm;
pub mod scraper;
pub mod telemetry;
pub mod transcript;

use std::sync::Arc;
use crate::config::Config;
use crate::llm::{LlmClientCache, SummarizerProvider};
use crate::scraper::{HttpPageLoader, PageLoader};
use crate::transcript::{TranscriptSource, YouTubeTranscripts};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub pages: Arc<dyn PageLoader>,
    pub summarizers: Arc<dyn SummarizerProvider>,
}

impl AppState {
    /// Wires the live YouTube, HTTP, and LLM collaborators.
    pub fn from_config(config: Config) -> error::Result<Self> {
        let pages = HttpPageLoader::new(config.fetch_timeout)?;
        let summarizers = LlmClientCache::new(&config.llm_base_url, &config.llm_model);

        Ok(AppState {
            config: Arc::new(config),
            transcripts: Arc::new(YouTubeTranscripts::new()),
            pages: Arc::new(pages),
            summarizers: Arc::new(summarizers),
        })
    }
}
