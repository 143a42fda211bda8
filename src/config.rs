use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_NEWS_URL: &str = "https://www.bbc.com";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_TRANSCRIPT_LANGUAGES: [&str; 3] = ["en", "en-US", "en-GB"];

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Used when the request does not carry its own key.
    pub groq_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub news_url: String,
    pub fetch_timeout: Duration,
    pub transcript_languages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            groq_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            news_url: DEFAULT_NEWS_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            transcript_languages: DEFAULT_TRANSCRIPT_LANGUAGES
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for anything unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Config::default();

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = get("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let fetch_timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(secs) => {
                let secs = secs.parse::<u64>().map_err(|e| {
                    AppError::ConfigError(format!("Invalid FETCH_TIMEOUT_SECS: {}", e))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.fetch_timeout,
        };

        let transcript_languages = match get("TRANSCRIPT_LANGUAGES") {
            Some(list) => {
                let languages: Vec<String> = list
                    .split(',')
                    .map(|lang| lang.trim().to_string())
                    .filter(|lang| !lang.is_empty())
                    .collect();
                if languages.is_empty() {
                    return Err(AppError::ConfigError(
                        "TRANSCRIPT_LANGUAGES must name at least one language".to_string(),
                    ));
                }
                languages
            }
            None => defaults.transcript_languages,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_api_key: get("GROQ_API_KEY"),
            llm_base_url: get("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: get("LLM_MODEL").unwrap_or(defaults.llm_model),
            news_url: get("NEWS_URL").unwrap_or(defaults.news_url),
            fetch_timeout,
            transcript_languages,
        })
    }
}
