use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url_digest::transcript::{TranscriptError, TranscriptSegment, TranscriptSource};

#[derive(Clone)]
pub enum TranscriptBehavior {
    Segments(Vec<&'static str>),
    /// Nothing in the preferred languages, these segments once unrestricted.
    OnlyOtherLanguage(Vec<&'static str>),
    Disabled,
    Unavailable,
}

#[derive(Clone)]
pub struct MockTranscripts {
    pub behavior: TranscriptBehavior,
    pub calls: Arc<Mutex<Vec<(String, Option<Vec<String>>)>>>,
}

impl MockTranscripts {
    pub fn new(behavior: TranscriptBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn segments(texts: &[&str]) -> Vec<TranscriptSegment> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TranscriptSegment {
            text: text.to_string(),
            start: i as f64,
            duration: 1.0,
        })
        .collect()
}

#[async_trait]
impl TranscriptSource for MockTranscripts {
    async fn fetch(
        &self,
        video_id: &str,
        languages: Option<&[String]>,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.map(<[String]>::to_vec)));

        match (&self.behavior, languages) {
            (TranscriptBehavior::Segments(texts), _) => Ok(segments(texts)),
            (TranscriptBehavior::OnlyOtherLanguage(_), Some(languages)) => {
                Err(TranscriptError::NoTranscriptFound {
                    video_id: video_id.to_string(),
                    languages: languages.to_vec(),
                })
            }
            (TranscriptBehavior::OnlyOtherLanguage(texts), None) => Ok(segments(texts)),
            (TranscriptBehavior::Disabled, _) => {
                Err(TranscriptError::TranscriptsDisabled(video_id.to_string()))
            }
            (TranscriptBehavior::Unavailable, _) => {
                Err(TranscriptError::VideoUnavailable(video_id.to_string()))
            }
        }
    }
}
