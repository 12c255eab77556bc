#![allow(dead_code)]
//! Shared fixtures: scripted in-memory providers that drive the whole
//! pipeline without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use chatloom::providers::{
    ChatMessage, CompletionProvider, ExtractedPage, ProviderError, QueryMatch,
    SearchExtractionProvider, SegmentMetadata, VectorIndexProvider,
};

/// Completion provider replaying a fixed script of replies, recording every
/// request it receives. Exhausting the script fails the call, which keeps
/// tests honest about how many completions a path performs.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<(Vec<ChatMessage>, String)>>,
}

impl ScriptedCompletion {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| (*r).to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Vec<ChatMessage>, String)> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push((messages.to_vec(), model.to_string()));
        self.replies
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .ok_or_else(|| ProviderError::MalformedResponse("completion script exhausted".into()))
    }
}

/// In-memory vector index with replace-by-id upserts.
///
/// Queries serve canned matches when provided, otherwise they surface the
/// stored entries in insertion order, which is enough for pipeline tests
/// that index and then retrieve.
#[derive(Default)]
pub struct InMemoryIndex {
    stored: Mutex<Vec<(String, Vec<f32>, SegmentMetadata)>>,
    canned_matches: Mutex<Vec<QueryMatch>>,
    ensured: Mutex<Vec<String>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(matches: Vec<QueryMatch>) -> Self {
        Self {
            canned_matches: Mutex::new(matches),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<(String, Vec<f32>, SegmentMetadata)> {
        self.stored.lock().expect("lock poisoned").clone()
    }

    pub fn upsert_count(&self) -> usize {
        self.stored.lock().expect("lock poisoned").len()
    }

    pub fn ensured_indexes(&self) -> Vec<String> {
        self.ensured.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl VectorIndexProvider for InMemoryIndex {
    async fn ensure_index(
        &self,
        name: &str,
        _dimension: usize,
        _metric: &str,
    ) -> Result<(), ProviderError> {
        self.ensured
            .lock()
            .expect("lock poisoned")
            .push(name.to_string());
        Ok(())
    }

    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: &SegmentMetadata,
    ) -> Result<(), ProviderError> {
        let mut stored = self.stored.lock().expect("lock poisoned");
        if let Some(entry) = stored.iter_mut().find(|(existing, _, _)| existing == id) {
            *entry = (id.to_string(), vector.to_vec(), metadata.clone());
        } else {
            stored.push((id.to_string(), vector.to_vec(), metadata.clone()));
        }
        Ok(())
    }

    async fn query(
        &self,
        _vector: &[f32],
        top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<QueryMatch>, ProviderError> {
        let canned = self.canned_matches.lock().expect("lock poisoned");
        if !canned.is_empty() {
            return Ok(canned.iter().take(top_k).cloned().collect());
        }
        let stored = self.stored.lock().expect("lock poisoned");
        Ok(stored
            .iter()
            .take(top_k)
            .map(|(id, _, metadata)| QueryMatch {
                id: id.clone(),
                score: 1.0,
                metadata: Some(metadata.clone()),
            })
            .collect())
    }
}

/// Extraction provider returning canned pages.
pub struct ScriptedSearch {
    pages: Vec<ExtractedPage>,
}

impl ScriptedSearch {
    pub fn new(pages: Vec<ExtractedPage>) -> Self {
        Self { pages }
    }

    pub fn empty() -> Self {
        Self { pages: Vec::new() }
    }

    pub fn page(url: &str, raw_content: &str) -> Self {
        Self::new(vec![ExtractedPage {
            url: url.to_string(),
            raw_content: raw_content.to_string(),
        }])
    }
}

#[async_trait]
impl SearchExtractionProvider for ScriptedSearch {
    async fn extract(&self, _urls: &[String]) -> Result<Vec<ExtractedPage>, ProviderError> {
        Ok(self.pages.clone())
    }

    async fn search_context(&self, _query: &str) -> Result<String, ProviderError> {
        Ok(String::new())
    }
}
