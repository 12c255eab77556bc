//! Response flows and the dispatch state machine that selects one of them.
//!
//! Each flow is a handler strategy producing the final response for a
//! request. A flow receives a read-only view of the request (the prompt and
//! the conversation memory) and returns the messages it produced; the router
//! invokes exactly one flow per request and terminates.

pub mod general;
pub mod history;
pub mod nonsense;
pub mod rag;
pub mod router;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::intent::Intent;
use crate::memory::ConversationMemory;
use crate::providers::ProviderError;

pub use general::GeneralFlow;
pub use history::HistoryFlow;
pub use nonsense::{NonsenseFlow, NONSENSE_REPLY};
pub use rag::{RagFlow, EMPTY_EXTRACTION_REPLY};
pub use router::{FlowRouter, RouterRun, TraceEntry};

/// Reply returned when a dispatched flow produced no message at all.
pub const NO_RESPONSE_REPLY: &str = "No response was produced for this request.";

/// Errors surfaced while executing a flow. Provider failures are not retried
/// and propagate to the caller.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("no handler registered for state {0}")]
    MissingHandler(FlowState),
}

/// States of the dispatch machine. `Start` and `End` are structural; every
/// other state carries exactly one handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FlowState {
    Start,
    History,
    Rag,
    General,
    Nonsense,
    End,
}

impl FlowState {
    /// The states that execute a handler, in routing-table order.
    pub const HANDLER_STATES: [FlowState; 4] = [
        FlowState::History,
        FlowState::Rag,
        FlowState::General,
        FlowState::Nonsense,
    ];

    /// Fixed routing table from classified intent to target state.
    #[must_use]
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::HistoryQuery => FlowState::History,
            Intent::FactualInfo => FlowState::Rag,
            Intent::Preference | Intent::Feedback | Intent::Correction => FlowState::General,
            Intent::Nonsense => FlowState::Nonsense,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Start => "start",
            FlowState::History => "history",
            FlowState::Rag => "rag",
            FlowState::General => "general",
            FlowState::Nonsense => "nonsense",
            FlowState::End => "end",
        };
        f.write_str(name)
    }
}

/// Routing decision computed once per request; ephemeral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutingDecision {
    pub intent: Intent,
    pub target: FlowState,
}

impl RoutingDecision {
    #[must_use]
    pub fn for_intent(intent: Intent) -> Self {
        Self {
            intent,
            target: FlowState::for_intent(intent),
        }
    }
}

/// Read-only view of one request, handed to the selected flow.
#[derive(Clone, Copy, Debug)]
pub struct FlowRequest<'a> {
    pub prompt: &'a str,
    pub memory: &'a ConversationMemory,
}

/// Messages produced by a flow execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowOutcome {
    pub messages: Vec<String>,
}

impl FlowOutcome {
    /// An outcome carrying a single message.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
        }
    }
}

/// A handler strategy producing the response for one routed request.
#[async_trait]
pub trait Flow: Send + Sync {
    async fn run(&self, request: FlowRequest<'_>) -> Result<FlowOutcome, FlowError>;
}
