//! Environment-backed configuration.
//!
//! Settings resolve from the process environment (with `.env` support) once
//! at startup; nothing here is re-read after construction.

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::intent::Granularity;
use crate::rag::codec::DEFAULT_DIMENSION;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Reads a required environment variable, loading `.env` first.
pub fn require_env(name: &'static str) -> Result<String, ConfigError> {
    dotenvy::dotenv().ok();
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Reads an optional environment variable.
#[must_use]
pub fn optional_env(name: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(name).ok()
}

pub(crate) fn parse_source_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| match Url::parse(entry) {
            Ok(_) => true,
            Err(err) => {
                warn!(url = entry, error = %err, "ignoring invalid source URL");
                false
            }
        })
        .map(str::to_string)
        .collect()
}

/// Tunable settings for one assistant instance.
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Completion model identifier passed to every provider call.
    pub model_id: String,
    /// Name of the vector index, created on first use when missing.
    pub index_name: String,
    /// Vector dimension for encoding and the index schema.
    pub dimension: usize,
    /// Similarity metric used when creating the index.
    pub metric: String,
    /// Number of nearest matches fetched per retrieval.
    pub top_k: usize,
    /// Budget, in characters, for accumulated context plus prompt.
    pub max_response_chars: usize,
    /// Maximum characters per indexed segment.
    pub max_segment_chars: usize,
    /// URLs indexed before answering factual questions.
    pub source_urls: Vec<String>,
    /// Classification granularity (six-way or simplified three-way).
    pub granularity: Granularity,
}

impl AssistantConfig {
    pub const DEFAULT_METRIC: &'static str = "cosine";
    pub const DEFAULT_TOP_K: usize = 3;
    pub const DEFAULT_MAX_RESPONSE_CHARS: usize = 5000;
    pub const DEFAULT_MAX_SEGMENT_CHARS: usize = 1000;

    #[must_use]
    pub fn new(model_id: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            index_name: index_name.into(),
            dimension: DEFAULT_DIMENSION,
            metric: Self::DEFAULT_METRIC.to_string(),
            top_k: Self::DEFAULT_TOP_K,
            max_response_chars: Self::DEFAULT_MAX_RESPONSE_CHARS,
            max_segment_chars: Self::DEFAULT_MAX_SEGMENT_CHARS,
            source_urls: Vec::new(),
            granularity: Granularity::default(),
        }
    }

    /// Resolves `MODEL_ID`, `INDEX_NAME`, and the optional comma-separated
    /// `RAG_SOURCE_URLS` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(require_env("MODEL_ID")?, require_env("INDEX_NAME")?);
        if let Some(raw) = optional_env("RAG_SOURCE_URLS") {
            config.source_urls = parse_source_urls(&raw);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_source_urls(mut self, source_urls: Vec<String>) -> Self {
        self.source_urls = source_urls;
        self
    }

    #[must_use]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_max_response_chars(mut self, max_response_chars: usize) -> Self {
        self.max_response_chars = max_response_chars;
        self
    }

    #[must_use]
    pub fn with_max_segment_chars(mut self, max_segment_chars: usize) -> Self {
        self.max_segment_chars = max_segment_chars;
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = AssistantConfig::new("model-x", "docs");
        assert_eq!(config.dimension, 1536);
        assert_eq!(config.metric, "cosine");
        assert_eq!(config.top_k, 3);
        assert_eq!(config.max_response_chars, 5000);
        assert_eq!(config.max_segment_chars, 1000);
        assert!(config.source_urls.is_empty());
        assert_eq!(config.granularity, Granularity::Fine);
    }

    #[test]
    fn source_url_lists_are_trimmed_and_filtered() {
        let urls = parse_source_urls(" https://a.example , ,https://b.example,");
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn invalid_source_urls_are_dropped() {
        let urls = parse_source_urls("https://a.example,not a url");
        assert_eq!(urls, vec!["https://a.example"]);
    }
}
