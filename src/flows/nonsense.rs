//! Handler for unintelligible messages.

use async_trait::async_trait;

use super::{Flow, FlowError, FlowOutcome, FlowRequest};

/// Fixed reply asking the user to rephrase.
pub const NONSENSE_REPLY: &str =
    "Sorry, I could not understand your message. Please rephrase it or send another question.";

/// Replies with the fixed rephrase request.
pub struct NonsenseFlow;

#[async_trait]
impl Flow for NonsenseFlow {
    async fn run(&self, _request: FlowRequest<'_>) -> Result<FlowOutcome, FlowError> {
        Ok(FlowOutcome::message(NONSENSE_REPLY))
    }
}
