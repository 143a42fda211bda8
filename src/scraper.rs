use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use ::scraper::{Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::document::ContentDocument;
use crate::error::{AppError, Result};

const USER_AGENT: &str = "Mozilla/5.0";

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

/// Loads the readable text of a web page.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<ContentDocument>;
}

pub struct HttpPageLoader {
    client: Client,
}

impl HttpPageLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageLoader for HttpPageLoader {
    async fn load(&self, url: &str) -> Result<ContentDocument> {
        let fetch_start = std::time::Instant::now();
        let html = fetch_html(&self.client, url).await?;
        debug!(url, elapsed = ?fetch_start.elapsed(), bytes = html.len(), "HTML fetched");

        let text = extract_readable_text(&html)
            .ok_or_else(|| AppError::ParseError("Could not extract readable text.".to_string()))?;
        info!(url, chars = text.len(), "Extracted page text");

        Ok(ContentDocument::new(text, url))
    }
}

async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;
    Ok(html)
}

/// Paragraph text when the page has any, otherwise the visible body text.
pub fn extract_readable_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    extract_paragraphs(&document).or_else(|| extract_body_text(&document))
}

fn extract_paragraphs(document: &Html) -> Option<String> {
    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect();

    (!paragraphs.is_empty()).then(|| paragraphs.join(" "))
}

fn extract_body_text(document: &Html) -> Option<String> {
    let body = document.select(&BODY_SELECTOR).next()?;

    let mut text = String::new();
    for node in body.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript" | "template"));
        if !hidden {
            text.push_str(chunk);
            text.push('\n');
        }
    }

    let collapsed = collapse_lines(&text);
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Trims every line and drops the blank ones.
fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
