//! Ingestion of web content into the vector index.

use std::sync::Arc;

use tracing::{debug, warn};

use super::codec;
use super::segmenter::TextSegmenter;
use crate::providers::{
    ProviderError, SearchExtractionProvider, SegmentMetadata, VectorIndexProvider,
};

/// A segment prepared for upsert into the vector index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedSegment {
    pub id: String,
    pub source_url: String,
    pub content: String,
    pub vector: Vec<f32>,
}

/// Result of an indexing pass.
///
/// `NothingExtracted` is the soft-failure case: the extraction provider had
/// no results at all, so the caller should surface a fixed notice instead of
/// querying an unchanged index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Number of segments upserted (zero when every page was empty).
    Indexed(usize),
    /// The extraction provider returned no results.
    NothingExtracted,
}

/// Extracts content from URLs, segments it, encodes each segment, and
/// upserts the result into the external vector index.
///
/// Indexing is idempotent: segment ids derive deterministically from the
/// sanitized source URL plus the segment position, so re-indexing a URL
/// replaces its previous segments instead of duplicating them.
pub struct ContentIndexer {
    search: Arc<dyn SearchExtractionProvider>,
    vector_index: Arc<dyn VectorIndexProvider>,
    segmenter: TextSegmenter,
    dimension: usize,
}

impl ContentIndexer {
    #[must_use]
    pub fn new(
        search: Arc<dyn SearchExtractionProvider>,
        vector_index: Arc<dyn VectorIndexProvider>,
        segmenter: TextSegmenter,
        dimension: usize,
    ) -> Self {
        Self {
            search,
            vector_index,
            segmenter,
            dimension,
        }
    }

    /// Indexes the content behind `urls`, returning the number of segments
    /// upserted. Pages with empty extracted content are skipped with a
    /// warning; a provider failure mid-loop leaves earlier URLs indexed and
    /// is corrected by the next pass.
    pub async fn index_urls(&self, urls: &[String]) -> Result<IndexOutcome, ProviderError> {
        if urls.is_empty() {
            return Ok(IndexOutcome::NothingExtracted);
        }

        let pages = self.search.extract(urls).await?;
        if pages.is_empty() {
            warn!(requested = urls.len(), "extraction returned no results");
            return Ok(IndexOutcome::NothingExtracted);
        }

        let mut indexed = 0usize;
        for page in pages {
            if page.raw_content.is_empty() {
                warn!(url = %page.url, "extracted content is empty; skipping");
                continue;
            }
            let segments = self.segments_for(&page.url, &page.raw_content);
            for segment in &segments {
                let metadata = SegmentMetadata {
                    url: segment.source_url.clone(),
                    content: segment.content.clone(),
                };
                self.vector_index
                    .upsert(&segment.id, &segment.vector, &metadata)
                    .await?;
            }
            debug!(url = %page.url, segments = segments.len(), "indexed page");
            indexed += segments.len();
        }
        Ok(IndexOutcome::Indexed(indexed))
    }

    fn segments_for(&self, url: &str, raw_content: &str) -> Vec<IndexedSegment> {
        let base_id = codec::sanitize_id(url);
        self.segmenter
            .segment(raw_content)
            .into_iter()
            .enumerate()
            .map(|(position, content)| IndexedSegment {
                id: format!("{base_id}_{position}"),
                source_url: url.to_string(),
                vector: codec::encode(&content, self.dimension),
                content,
            })
            .collect()
    }
}
