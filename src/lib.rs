//! Typed orchestration layer for LLM interactions.
//!
//! This crate provides canonical prompt construction, a composable
//! reliability pipeline, a pluggable provider interface, typed JSON
//! response parsing and validation, and a transactional conversation
//! session. It has no dependency on any concrete HTTP provider -- callers
//! implement [`Provider`] for whatever backend they use and plug it into
//! the pipeline built from this crate's reliability operators.
//!
//! # Architecture
//!
//! - [`Prompt`] is the canonical, deterministically-rendered request shape
//! - [`Stage`] is the uniform contract every reliability operator and the
//!   terminal provider call share; see [`operators`] for the available
//!   wrappers (`Retry`, `Backoff`, `Timeout`, `CircuitBreaker`,
//!   `RateLimit`, `Fallback`, `ErrorHandler`, `Debug`)
//! - [`Service`] is the typed executor: it resolves temperature, validates
//!   the prompt, runs the pipeline, decodes and validates the response,
//!   and commits the turn to the [`Session`] atomically
//! - [`synapse`] holds the eight task-specific façades built on `Service`
//! - [`hooks`] is the observability surface: an emit-only [`HookSink`]
//!   paired with `tracing` events at every signal point
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use synapse_orch::pipeline::Terminal;
//! use synapse_orch::service::Service;
//! use synapse_orch::session::Session;
//! use synapse_orch::synapse::Binary;
//! use synapse_orch::temperature;
//!
//! let service = Service::new(Terminal::new(my_provider), Arc::new(Session::new()));
//! let binary = Binary::new(service);
//! let result = binary.call("Is this spam?", "buy now!!!", temperature::UNSET).await?;
//! ```

pub mod error;
pub mod hooks;
pub mod message;
pub mod operators;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod request;
pub mod schema;
pub mod service;
pub mod session;
pub mod synapse;
pub mod temperature;
pub mod validator;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{OrchestratorError, Result};
pub use hooks::{HookEvent, HookSink, NoopHookSink};
pub use message::{Message, Role, Usage};
pub use pipeline::{Stage, StageContext, Terminal};
pub use prompt::{Prompt, PromptError};
pub use provider::{Provider, ProviderResponse};
pub use request::Request;
pub use schema::{Described, SchemaBuilder};
pub use service::Service;
pub use session::Session;
pub use validator::Validate;
