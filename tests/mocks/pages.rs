use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url_digest::document::ContentDocument;
use url_digest::error::{AppError, Result};
use url_digest::scraper::PageLoader;

#[derive(Clone)]
pub struct MockPages {
    pub text: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockPages {
    pub fn new(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            text: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl PageLoader for MockPages {
    async fn load(&self, url: &str) -> Result<ContentDocument> {
        self.calls.lock().unwrap().push(url.to_string());
        match &self.text {
            Some(text) => Ok(ContentDocument::new(text.clone(), url)),
            None => Err(AppError::FetchError("connection refused".to_string())),
        }
    }
}
