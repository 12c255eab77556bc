//! Assembly of the assistant: providers, classifier, router, and memory.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AssistantConfig;
use crate::flows::{FlowError, FlowRouter, GeneralFlow, HistoryFlow, NonsenseFlow, RagFlow};
use crate::intent::IntentClassifier;
use crate::memory::ConversationMemory;
use crate::message::Turn;
use crate::providers::{ProviderError, Providers};
use crate::rag::{ContentIndexer, Retriever, TextSegmenter};

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// A session-scoped conversational assistant.
///
/// Classifies each incoming message, routes it to one response flow, and
/// records the exchange in conversation memory. One instance corresponds to
/// one session; memory dies with it.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use chatloom::assistant::Assistant;
/// use chatloom::config::AssistantConfig;
/// use chatloom::providers::{GroqCompletion, PineconeIndex, Providers, TavilySearch};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let providers = Providers::new(
///     Arc::new(GroqCompletion::new("groq-key")),
///     Arc::new(PineconeIndex::new("pinecone-key", "my-index.svc.pinecone.io", "us-east-1")),
///     Arc::new(TavilySearch::new("tavily-key")),
/// );
/// let config = AssistantConfig::new("llama-3.3-70b-versatile", "site-content")
///     .with_source_urls(vec!["https://example.com/".to_string()]);
///
/// let mut assistant = Assistant::new(config, providers).await?;
/// let reply = assistant.generate("What does the site say about pricing?").await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
pub struct Assistant {
    session_id: Uuid,
    router: FlowRouter,
    memory: ConversationMemory,
}

impl Assistant {
    /// Builds an assistant over the given provider bundle, creating the
    /// vector index when it does not exist yet. The bundle is constructed
    /// once by the caller and never reconfigured afterwards.
    pub async fn new(
        config: AssistantConfig,
        providers: Providers,
    ) -> Result<Self, AssistantError> {
        providers
            .vector_index
            .ensure_index(&config.index_name, config.dimension, &config.metric)
            .await?;

        let classifier = IntentClassifier::new(
            providers.completion.clone(),
            config.model_id.clone(),
            config.granularity,
        );
        let indexer = ContentIndexer::new(
            providers.search.clone(),
            providers.vector_index.clone(),
            TextSegmenter::new(config.max_segment_chars),
            config.dimension,
        );
        let retriever = Retriever::new(
            providers.completion.clone(),
            providers.vector_index.clone(),
            config.model_id.clone(),
            config.top_k,
            config.max_response_chars,
            config.dimension,
        );
        let router = FlowRouter::new(
            Arc::new(classifier),
            Arc::new(HistoryFlow),
            Arc::new(RagFlow::new(indexer, retriever, config.source_urls.clone())),
            Arc::new(GeneralFlow::new(
                providers.completion.clone(),
                config.model_id.clone(),
            )),
            Arc::new(NonsenseFlow),
        );

        Ok(Self {
            session_id: Uuid::new_v4(),
            router,
            memory: ConversationMemory::new(),
        })
    }

    /// Produces the response for one user message.
    ///
    /// The user turn and the produced assistant turn are appended to memory
    /// only after the response exists, so classification and the history
    /// handler never observe a placeholder entry for the in-flight message.
    pub async fn generate(&mut self, prompt: &str) -> Result<String, AssistantError> {
        info!(session = %self.session_id, "handling message");
        let run = self.router.dispatch(prompt, &self.memory).await?;
        for entry in run.trace() {
            debug!(session = %self.session_id, state = %entry.state, "{}", entry.detail);
        }

        let response = run.into_response();
        self.memory.append(Turn::user(prompt));
        self.memory.append(Turn::assistant(response.clone()));
        Ok(response)
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Read-only view of the session's conversation log.
    #[must_use]
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }
}
