//! Search and page-extraction client for the Tavily API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, ExtractedPage, ProviderError, SearchExtractionProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Search/extraction provider backed by Tavily's `/extract` and `/search`
/// endpoints.
#[derive(Clone, Debug)]
pub struct TavilySearch {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TavilySearch {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the API base URL. Used to point at a mock server in tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    api_key: &'a str,
    urls: &'a [String],
}

#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    results: Vec<WireExtractResult>,
}

// raw_content is null for pages Tavily fetched but could not render to text.
#[derive(Deserialize)]
struct WireExtractResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    raw_content: Option<String>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<WireSearchResult>,
}

#[derive(Serialize, Deserialize)]
struct WireSearchResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[async_trait]
impl SearchExtractionProvider for TavilySearch {
    async fn extract(&self, urls: &[String]) -> Result<Vec<ExtractedPage>, ProviderError> {
        let response = self
            .client
            .post(format!("{}/extract", self.base_url))
            .json(&ExtractRequest {
                api_key: &self.api_key,
                urls,
            })
            .send()
            .await?;
        let payload: ExtractResponse = check_status(response).await?.json().await?;
        Ok(payload
            .results
            .into_iter()
            .map(|result| ExtractedPage {
                url: result.url,
                raw_content: result.raw_content.unwrap_or_default(),
            })
            .collect())
    }

    async fn search_context(&self, query: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
            })
            .send()
            .await?;
        let payload: SearchResponse = check_status(response).await?.json().await?;
        // Mirrors the upstream SDK: the context is the JSON-encoded list of
        // result sources.
        serde_json::to_string(&payload.results)
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))
    }
}
