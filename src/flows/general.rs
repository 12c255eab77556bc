//! Handler for general conversation: a single pass-through completion.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Flow, FlowError, FlowOutcome, FlowRequest};
use crate::providers::{ChatMessage, CompletionProvider};

/// Forwards the raw prompt to the completion provider. No retry, no
/// post-processing.
pub struct GeneralFlow {
    completion: Arc<dyn CompletionProvider>,
    model_id: String,
}

impl GeneralFlow {
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionProvider>, model_id: impl Into<String>) -> Self {
        Self {
            completion,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl Flow for GeneralFlow {
    async fn run(&self, request: FlowRequest<'_>) -> Result<FlowOutcome, FlowError> {
        let reply = self
            .completion
            .complete(&[ChatMessage::user(request.prompt)], &self.model_id)
            .await?;
        Ok(FlowOutcome::message(reply))
    }
}
