//! One-shot dispatch state machine.
//!
//! `START` classifies the message and selects a target state from the fixed
//! routing table; the target state runs its handler and transitions
//! unconditionally to `END`. No backtracking, no retry, no cycle. The router
//! carries no state across requests; everything request-scoped lives in the
//! returned [`RouterRun`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use super::{Flow, FlowError, FlowOutcome, FlowRequest, FlowState, RoutingDecision, NO_RESPONSE_REPLY};
use crate::intent::Classify;
use crate::memory::ConversationMemory;

/// One step of a routed request, for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct TraceEntry {
    pub when: DateTime<Utc>,
    pub state: FlowState,
    pub detail: String,
}

/// The request-scoped result of a dispatch: the trace and the messages the
/// selected flow produced.
#[derive(Debug, Default)]
pub struct RouterRun {
    trace: Vec<TraceEntry>,
    messages: Vec<String>,
}

impl RouterRun {
    fn record(&mut self, state: FlowState, detail: impl Into<String>) {
        self.trace.push(TraceEntry {
            when: Utc::now(),
            state,
            detail: detail.into(),
        });
    }

    fn absorb(&mut self, outcome: FlowOutcome) {
        self.messages.extend(outcome.messages);
    }

    /// Trace entries in execution order.
    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Messages produced by the dispatched flow, in order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The most recently produced message, or the fixed no-response reply.
    #[must_use]
    pub fn into_response(mut self) -> String {
        self.messages
            .pop()
            .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string())
    }
}

/// Dispatches a classified request to exactly one flow handler.
pub struct FlowRouter {
    classifier: Arc<dyn Classify>,
    handlers: FxHashMap<FlowState, Arc<dyn Flow>>,
}

impl FlowRouter {
    /// Builds the router with one handler per routed state. Taking each
    /// handler as a named parameter makes the transition table complete by
    /// construction; the assertion guards against the table and
    /// [`FlowState::HANDLER_STATES`] drifting apart.
    #[must_use]
    pub fn new(
        classifier: Arc<dyn Classify>,
        history: Arc<dyn Flow>,
        rag: Arc<dyn Flow>,
        general: Arc<dyn Flow>,
        nonsense: Arc<dyn Flow>,
    ) -> Self {
        let mut handlers: FxHashMap<FlowState, Arc<dyn Flow>> = FxHashMap::default();
        handlers.insert(FlowState::History, history);
        handlers.insert(FlowState::Rag, rag);
        handlers.insert(FlowState::General, general);
        handlers.insert(FlowState::Nonsense, nonsense);
        debug_assert!(FlowState::HANDLER_STATES
            .iter()
            .all(|state| handlers.contains_key(state)));
        Self {
            classifier,
            handlers,
        }
    }

    /// Runs one request through the machine and returns its trace and
    /// response. Re-entrant: concurrent or repeated dispatches share nothing
    /// but the immutable handlers.
    pub async fn dispatch(
        &self,
        prompt: &str,
        memory: &ConversationMemory,
    ) -> Result<RouterRun, FlowError> {
        let mut run = RouterRun::default();
        let mut state = FlowState::Start;

        loop {
            state = match state {
                FlowState::Start => {
                    let intent = self.classifier.classify(prompt).await;
                    let decision = RoutingDecision::for_intent(intent);
                    run.record(
                        FlowState::Start,
                        format!("detected intent: {}", decision.intent),
                    );
                    run.record(decision.target, format!("selected flow: {}", decision.target));
                    debug!(intent = %decision.intent, flow = %decision.target, "routed request");
                    decision.target
                }
                FlowState::End => break,
                handler_state => {
                    let handler = self
                        .handlers
                        .get(&handler_state)
                        .ok_or(FlowError::MissingHandler(handler_state))?;
                    let outcome = handler.run(FlowRequest { prompt, memory }).await?;
                    run.absorb(outcome);
                    FlowState::End
                }
            };
        }
        Ok(run)
    }
}
