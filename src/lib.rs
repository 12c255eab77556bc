//! # Chatloom: intent-routed conversational assistant with RAG
//!
//! Chatloom classifies each incoming user message into an intent and routes
//! it to one of several response strategies: answering from conversation
//! history, answering via retrieval-augmented generation over indexed web
//! content, or answering via direct free-form completion.
//!
//! ## Core Concepts
//!
//! - **Intent**: the classified purpose of a message, drives routing
//! - **Flows**: handler strategies (History, RAG, General, Nonsense), exactly
//!   one of which runs per request
//! - **Memory**: an append-only log of conversation turns, scoped to a session
//! - **RAG pipeline**: URL extraction, segmentation, deterministic encoding,
//!   vector upsert, and budgeted top-K retrieval
//! - **Providers**: injected contracts for chat completion, the vector index,
//!   and web search/extraction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chatloom::assistant::Assistant;
//! use chatloom::config::AssistantConfig;
//! use chatloom::providers::{GroqCompletion, PineconeIndex, Providers, TavilySearch};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AssistantConfig::from_env()?;
//! let providers = Providers::new(
//!     Arc::new(GroqCompletion::new(chatloom::config::require_env("GROQ_API_KEY")?)),
//!     Arc::new(PineconeIndex::new(
//!         chatloom::config::require_env("PINECONE_API_KEY")?,
//!         chatloom::config::require_env("PINECONE_HOST")?,
//!         chatloom::config::require_env("PINECONE_ENVIRONMENT")?,
//!     )),
//!     Arc::new(TavilySearch::new(chatloom::config::require_env("TAVILY_API_KEY")?)),
//! );
//!
//! let mut assistant = Assistant::new(config, providers).await?;
//! let reply = assistant.generate("qual foi minha primeira mensagem?").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Provider handles are built once at process start and shared read-only;
//! any backend satisfying the [`providers`] contracts can be injected in
//! place of the bundled HTTP clients, which is how the test suite drives the
//! whole pipeline without a network.
//!
//! ## Module Guide
//!
//! - [`assistant`] - Session entry point wiring all components
//! - [`intent`] - Intent taxonomy and classification
//! - [`flows`] - Response flows and the dispatch state machine
//! - [`memory`] - Append-only conversation log
//! - [`message`] - Turn and speaker types
//! - [`rag`] - Indexing, encoding, segmentation, and retrieval
//! - [`providers`] - Backing-service contracts and HTTP clients
//! - [`config`] - Environment-backed settings
//! - [`telemetry`] - Tracing bootstrap

pub mod assistant;
pub mod config;
pub mod flows;
pub mod intent;
pub mod memory;
pub mod message;
pub mod providers;
pub mod rag;
pub mod telemetry;

pub use assistant::{Assistant, AssistantError};
pub use config::AssistantConfig;
pub use intent::{Granularity, Intent};
pub use memory::ConversationMemory;
pub use message::{Speaker, Turn};
