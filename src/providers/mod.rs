//! Contracts for the three backing services and their HTTP clients.
//!
//! The core components depend only on the traits defined here; the concrete
//! clients ([`GroqCompletion`], [`PineconeIndex`], [`TavilySearch`]) are
//! constructed once at process start and injected through a [`Providers`]
//! bundle. Provider handles are connect-only after construction: the core
//! never mutates their configuration.
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │   Providers bundle   │
//!                 └──────────┬───────────┘
//!           ┌────────────────┼────────────────┐
//!           ▼                ▼                ▼
//!   CompletionProvider  VectorIndexProvider  SearchExtractionProvider
//!      (chat models)     (vector upsert /       (URL extraction /
//!                          top-K query)          search context)
//! ```

pub mod groq;
pub mod pinecone;
pub mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub use groq::GroqCompletion;
pub use pinecone::PineconeIndex;
pub use tavily::TavilySearch;

/// Errors surfaced by provider calls.
///
/// The core never retries these; they propagate to the caller of
/// [`Assistant::generate`](crate::assistant::Assistant::generate) as a
/// generic failure for the presentation layer to absorb.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure talking to provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// A wire-level chat message for completion requests.
///
/// Distinct from the domain [`Turn`](crate::message::Turn): this is the
/// `{role, content}` shape completion APIs expect, with free-form roles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub const USER: &'static str = "user";
    pub const ASSISTANT: &'static str = "assistant";
    pub const SYSTEM: &'static str = "system";

    #[must_use]
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }

    /// Creates a user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Self::USER, content)
    }

    /// Creates a system-role message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Self::SYSTEM, content)
    }
}

/// Metadata stored alongside each indexed vector.
///
/// Fields default to empty on deserialization so a match carrying partial
/// metadata still parses; the retriever filters empty content downstream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMetadata {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// One entry of a nearest-match query result, ordered best-first.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<SegmentMetadata>,
}

/// A page returned by the extraction provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub raw_content: String,
}

/// Free-form chat completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `messages` to `model` and returns the reply text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, ProviderError>;
}

/// External vector index with replace-by-id upsert semantics.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Creates the named index if it does not already exist.
    async fn ensure_index(
        &self,
        name: &str,
        dimension: usize,
        metric: &str,
    ) -> Result<(), ProviderError>;

    /// Inserts or replaces the vector stored under `id`.
    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: &SegmentMetadata,
    ) -> Result<(), ProviderError>;

    /// Returns the `top_k` nearest matches, best first.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>, ProviderError>;
}

/// Web search and page-content extraction.
#[async_trait]
pub trait SearchExtractionProvider: Send + Sync {
    /// Fetches the raw content behind each URL. Pages the provider could not
    /// extract are simply absent from the result.
    async fn extract(&self, urls: &[String]) -> Result<Vec<ExtractedPage>, ProviderError>;

    /// Returns aggregated search context for a free-form query.
    async fn search_context(&self, query: &str) -> Result<String, ProviderError>;
}

/// Resolves a response into an [`ProviderError::Api`] when the status is not
/// a success, preserving the response body for diagnostics.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Bundle of provider handles, constructed once at process start and shared
/// read-only by every component.
#[derive(Clone)]
pub struct Providers {
    pub completion: Arc<dyn CompletionProvider>,
    pub vector_index: Arc<dyn VectorIndexProvider>,
    pub search: Arc<dyn SearchExtractionProvider>,
}

impl Providers {
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        vector_index: Arc<dyn VectorIndexProvider>,
        search: Arc<dyn SearchExtractionProvider>,
    ) -> Self {
        Self {
            completion,
            vector_index,
            search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_constructors_set_roles() {
        assert_eq!(ChatMessage::user("hi").role, "user");
        assert_eq!(ChatMessage::system("rules").role, "system");
        assert_eq!(ChatMessage::new("function", "out").role, "function");
    }
}
