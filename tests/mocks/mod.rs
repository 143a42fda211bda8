pub mod pages;
pub mod summarizer;
pub mod transcripts;
