//! The [`Provider`] trait: the narrow interface the terminal pipeline stage
//! uses to contact an LLM.
//!
//! Concrete provider adapters (OpenAI/Anthropic/Azure/Bedrock HTTP clients)
//! are an external concern and are not part of this crate; see
//! [`crate::testing::ScriptedProvider`] for the in-memory double this
//! crate's own tests use.

use std::sync::Arc;

use async_trait::async_trait;

use crate::message::{Message, Usage};

/// Raw content and usage returned by a provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// The raw completion text. The [`Service`](crate::service::Service) is
    /// responsible for decoding this as JSON; the provider never parses it.
    pub content: String,
    /// Token usage reported by the provider.
    pub usage: Usage,
}

/// An LLM provider: the sole external collaborator contacted by the
/// terminal pipeline stage.
///
/// Implementations own their HTTP, authentication, protocol-level retries,
/// and prompt-cache hints. The orchestrator treats `content` as opaque
/// except for JSON decoding.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The error type returned by this provider's calls.
    type Error: std::fmt::Display + Send + Sync + 'static;

    /// Returns the provider's name (e.g. `"openai"`, `"anthropic"`).
    fn name(&self) -> &str;

    /// Execute a chat completion call against the given ordered message
    /// history (including the newly rendered user message) at the given
    /// temperature.
    async fn call(
        &self,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, Self::Error>;
}

#[async_trait]
impl<P: Provider> Provider for Arc<P> {
    type Error = P::Error;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn call(
        &self,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, Self::Error> {
        (**self).call(messages, temperature).await
    }
}
