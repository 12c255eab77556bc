//! Vector-index client for the Pinecone REST API.
//!
//! Index management goes through the control plane; upserts and queries go
//! to the per-index data-plane host.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, ProviderError, QueryMatch, SegmentMetadata, VectorIndexProvider};

pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const DEFAULT_CLOUD: &str = "aws";

/// Vector index provider backed by a Pinecone serverless index.
#[derive(Clone, Debug)]
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    control_plane_url: String,
    index_host: String,
    cloud: String,
    region: String,
}

impl PineconeIndex {
    /// Creates a client for the index served at `index_host`, creating the
    /// index in `region` when it does not exist yet. The host may be given
    /// bare (as the Pinecone console reports it) or with a scheme.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        index_host: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let index_host = index_host.into();
        let index_host = if index_host.starts_with("http://") || index_host.starts_with("https://")
        {
            index_host
        } else {
            format!("https://{index_host}")
        };
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
            index_host,
            cloud: DEFAULT_CLOUD.to_string(),
            region: region.into(),
        }
    }

    /// Overrides the control-plane URL. Used to point at a mock server in tests.
    #[must_use]
    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into();
        self
    }

    #[must_use]
    pub fn with_cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = cloud.into();
        self
    }
}

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexEntry>,
}

#[derive(Deserialize)]
struct IndexEntry {
    name: String,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: [UpsertVector<'a>; 1],
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a SegmentMetadata,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<SegmentMetadata>,
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn ensure_index(
        &self,
        name: &str,
        dimension: usize,
        metric: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(format!("{}/indexes", self.control_plane_url))
            .header("Api-Key", &self.api_key)
            .send()
            .await?;
        let listing: IndexList = check_status(response).await?.json().await?;
        if listing.indexes.iter().any(|entry| entry.name == name) {
            return Ok(());
        }

        debug!(index = name, dimension, metric, "creating vector index");
        let response = self
            .client
            .post(format!("{}/indexes", self.control_plane_url))
            .header("Api-Key", &self.api_key)
            .json(&CreateIndexRequest {
                name,
                dimension,
                metric,
                spec: IndexSpec {
                    serverless: ServerlessSpec {
                        cloud: &self.cloud,
                        region: &self.region,
                    },
                },
            })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: &SegmentMetadata,
    ) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(format!("{}/vectors/upsert", self.index_host))
            .header("Api-Key", &self.api_key)
            .json(&UpsertRequest {
                vectors: [UpsertVector {
                    id,
                    values: vector,
                    metadata,
                }],
            })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>, ProviderError> {
        let response = self
            .client
            .post(format!("{}/query", self.index_host))
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata,
            })
            .send()
            .await?;
        let payload: QueryResponse = check_status(response).await?.json().await?;
        Ok(payload
            .matches
            .into_iter()
            .map(|entry| QueryMatch {
                id: entry.id,
                score: entry.score,
                metadata: entry.metadata,
            })
            .collect())
    }
}
