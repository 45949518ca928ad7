//! [`Request`]: the record of a single [`Service`](crate::service::Service)
//! execution.
//!
//! The pipeline itself is driven by [`Stage::call`](crate::pipeline::Stage)'s
//! narrower `(messages, temperature)` signature rather than by passing a
//! `Request` through every operator -- operators only ever need the message
//! history and temperature, and a single `&Request` argument would force
//! every operator to reach into it for those two fields. `Request` is kept
//! as the data record [`Service`](crate::service::Service) builds up across
//! an execution and can hand back to a caller for diagnostics.
use crate::message::{Message, Usage};

/// A snapshot of one orchestration execution: what was asked, and (once
/// known) what came back.
#[derive(Debug, Clone)]
pub struct Request {
    /// Unique id for this execution, generated once at the start.
    pub id: String,
    /// The session this execution ran against.
    pub session_id: String,
    /// The synapse façade name, e.g. `"binary"`.
    pub synapse: &'static str,
    /// The provider's name.
    pub provider: String,
    /// The resolved (non-sentinel) temperature used for this call.
    pub temperature: f32,
    /// The message history sent to the provider, including the newly
    /// rendered user message.
    pub messages: Vec<Message>,
    /// The raw provider response content, once the call completes
    /// successfully.
    pub response: Option<String>,
    /// Usage reported by the provider, once known.
    pub usage: Option<Usage>,
    /// A human-readable error description, if the execution failed.
    pub error: Option<String>,
}

impl Request {
    /// Start a new, in-flight record.
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        synapse: &'static str,
        provider: impl Into<String>,
        temperature: f32,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            synapse,
            provider: provider.into(),
            temperature,
            messages,
            response: None,
            usage: None,
            error: None,
        }
    }

    /// Record a successful provider response.
    pub fn mark_response(&mut self, content: impl Into<String>, usage: Usage) {
        self.response = Some(content.into());
        self.usage = Some(usage);
    }

    /// Record a terminal failure.
    pub fn mark_error(&mut self, error: impl std::fmt::Display) {
        self.error = Some(error.to_string());
    }

    /// `true` once either a response or an error has been recorded.
    pub fn is_finished(&self) -> bool {
        self.response.is_some() || self.error.is_some()
    }
}
