//! Retrieval and response assembly for RAG-routed questions.

use std::sync::Arc;

use tracing::debug;

use super::codec;
use crate::providers::{
    ChatMessage, CompletionProvider, ProviderError, QueryMatch, VectorIndexProvider,
};

/// Reply used when no indexed content is relevant to the question, or when
/// the response budget excludes every match.
pub const NO_RELEVANT_INFO_REPLY: &str =
    "Sorry, I could not find relevant information to answer your question.";

const SYNTHESIS_PREAMBLE: &str = "Answer the question above using only the reference \
     content below. If the content does not cover the question, say so plainly.";

/// A scored nearest match with its stored segment content. Ephemeral: lives
/// only for the duration of one answer.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalMatch {
    pub id: String,
    pub score: f32,
    pub content: String,
}

/// Answers a prompt from indexed content: encode, query top-K, assemble a
/// budgeted context, and synthesize the final reply through the completion
/// provider.
pub struct Retriever {
    completion: Arc<dyn CompletionProvider>,
    vector_index: Arc<dyn VectorIndexProvider>,
    model_id: String,
    top_k: usize,
    max_response_chars: usize,
    dimension: usize,
}

impl Retriever {
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        vector_index: Arc<dyn VectorIndexProvider>,
        model_id: impl Into<String>,
        top_k: usize,
        max_response_chars: usize,
        dimension: usize,
    ) -> Self {
        Self {
            completion,
            vector_index,
            model_id: model_id.into(),
            top_k,
            max_response_chars,
            dimension,
        }
    }

    /// Produces an answer for `prompt`, or the fixed
    /// [`NO_RELEVANT_INFO_REPLY`] when nothing useful was retrieved.
    pub async fn answer(&self, prompt: &str) -> Result<String, ProviderError> {
        let vector = codec::encode(prompt, self.dimension);
        let matches = self
            .vector_index
            .query(&vector, self.top_k, true)
            .await?;
        let ranked = relevant_matches(matches);
        if ranked.is_empty() {
            debug!("no matches with content for prompt");
            return Ok(NO_RELEVANT_INFO_REPLY.to_string());
        }

        let Some(context) = assemble_context(&ranked, prompt, self.max_response_chars) else {
            debug!("response budget excluded every match");
            return Ok(NO_RELEVANT_INFO_REPLY.to_string());
        };

        let synthesis = format!("{prompt}\n\n{SYNTHESIS_PREAMBLE}\n\n{context}");
        self.completion
            .complete(&[ChatMessage::user(synthesis)], &self.model_id)
            .await
    }
}

/// Keeps only matches that carry non-empty content, preserving rank order.
fn relevant_matches(matches: Vec<QueryMatch>) -> Vec<RetrievalMatch> {
    matches
        .into_iter()
        .filter_map(|entry| {
            let metadata = entry.metadata?;
            if metadata.content.is_empty() {
                return None;
            }
            Some(RetrievalMatch {
                id: entry.id,
                score: entry.score,
                content: metadata.content,
            })
        })
        .collect()
}

/// Greedily accumulates match contents in ranked order. The accumulated text
/// (separators included) plus the prompt always stays within `budget`
/// characters; accumulation stops at the first match that would overflow.
/// Returns `None` when not even the best match fits.
fn assemble_context(ranked: &[RetrievalMatch], prompt: &str, budget: usize) -> Option<String> {
    let prompt_chars = prompt.chars().count();
    let mut context = String::new();
    let mut used = 0usize;
    for entry in ranked {
        let separator = usize::from(!context.is_empty());
        let addition = separator + entry.content.chars().count();
        if used + addition + prompt_chars > budget {
            break;
        }
        if separator == 1 {
            context.push('\n');
        }
        context.push_str(&entry.content);
        used += addition;
    }
    if context.is_empty() {
        None
    } else {
        Some(context)
    }
}
