//! Retrieval-augmented generation pipeline.
//!
//! ```text
//! URLs ──► indexer (extract ─► segmenter ─► codec ─► upsert) ──► vector index
//!
//! prompt ──► retriever (codec ─► top-K query ─► budgeted context) ──► synthesis
//! ```

pub mod codec;
pub mod indexer;
pub mod retriever;
pub mod segmenter;

pub use indexer::{ContentIndexer, IndexOutcome, IndexedSegment};
pub use retriever::{RetrievalMatch, Retriever, NO_RELEVANT_INFO_REPLY};
pub use segmenter::TextSegmenter;
