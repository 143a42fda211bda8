/// Text pulled from a single source, handed to the summarizer and dropped
/// once the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub text: String,
    pub source: String,
}

impl ContentDocument {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
