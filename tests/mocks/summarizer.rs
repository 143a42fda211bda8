use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url_digest::document::ContentDocument;
use url_digest::error::{AppError, Result};
use url_digest::llm::{Summarizer, SummarizerProvider};

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub fail_with: Option<String>,
    pub keys: Arc<Mutex<Vec<String>>>,
    pub calls: Arc<Mutex<Vec<Vec<ContentDocument>>>>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            fail_with: None,
            keys: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, docs: &[ContentDocument]) -> Result<String> {
        self.calls.lock().unwrap().push(docs.to_vec());
        match &self.fail_with {
            Some(msg) => Err(AppError::LlmError(msg.clone())),
            None => Ok(self.summary.clone()),
        }
    }
}

impl SummarizerProvider for MockSummarizer {
    fn for_key(&self, api_key: &str) -> Arc<dyn Summarizer> {
        self.keys.lock().unwrap().push(api_key.to_string());
        Arc::new(self.clone())
    }
}
