//! Handler for factual questions answered from indexed web content.

use async_trait::async_trait;
use tracing::debug;

use super::{Flow, FlowError, FlowOutcome, FlowRequest};
use crate::rag::{ContentIndexer, IndexOutcome, Retriever};

/// Reply when the extraction provider had no results for the source URLs.
pub const EMPTY_EXTRACTION_REPLY: &str =
    "It was not possible to extract information from the configured sources.";

/// Indexes the configured source URLs, then answers the prompt from the
/// index. Indexing is idempotent, so running it per request only refreshes
/// the same segment ids.
pub struct RagFlow {
    indexer: ContentIndexer,
    retriever: Retriever,
    source_urls: Vec<String>,
}

impl RagFlow {
    #[must_use]
    pub fn new(indexer: ContentIndexer, retriever: Retriever, source_urls: Vec<String>) -> Self {
        Self {
            indexer,
            retriever,
            source_urls,
        }
    }
}

#[async_trait]
impl Flow for RagFlow {
    async fn run(&self, request: FlowRequest<'_>) -> Result<FlowOutcome, FlowError> {
        match self.indexer.index_urls(&self.source_urls).await? {
            IndexOutcome::NothingExtracted => {
                Ok(FlowOutcome::message(EMPTY_EXTRACTION_REPLY))
            }
            IndexOutcome::Indexed(segments) => {
                debug!(segments, "index refreshed; answering from retrieval");
                let answer = self.retriever.answer(request.prompt).await?;
                Ok(FlowOutcome::message(answer))
            }
        }
    }
}
