//! The [`Stage`] trait: the uniform composable contract every reliability
//! operator and the terminal provider call share.

use async_trait::async_trait;

use crate::error::OrchestratorError;
use crate::hooks::HookSink;
use crate::message::Message;
use crate::provider::{Provider, ProviderResponse};

/// Per-call context threaded through a [`Stage`] invocation.
///
/// Carries identifiers and the optional hook sink rather than letting each
/// operator reach for ambient/global state.
pub struct StageContext<'a> {
    /// The request id generated once per [`Service`](crate::service::Service)
    /// execution and shared by every stage invoked within it.
    pub request_id: &'a str,
    /// The hook sink to emit provider-call signals to, if the caller
    /// attached one.
    pub hooks: Option<&'a dyn HookSink>,
}

impl<'a> StageContext<'a> {
    /// Construct a context with no attached hook sink.
    pub fn new(request_id: &'a str) -> Self {
        Self {
            request_id,
            hooks: None,
        }
    }

    /// Attach a hook sink to this context.
    pub fn with_hooks(mut self, hooks: &'a dyn HookSink) -> Self {
        self.hooks = Some(hooks);
        self
    }
}

/// A composable transformer in the reliability pipeline: given a message
/// history and a temperature, produce a [`ProviderResponse`] or fail.
///
/// The terminal stage ([`Terminal`]) is the only implementation that
/// actually contacts a [`Provider`]; every reliability operator
/// (`Retry`, `Backoff`, `Timeout`, `CircuitBreaker`, `RateLimit`,
/// `Fallback`, `ErrorHandler`, `Debug`) wraps an inner `Stage` and returns a
/// new one with the same contract, so stages compose by nesting.
#[async_trait]
pub trait Stage: Send + Sync {
    /// The error type this stage (and everything it wraps) can fail with.
    type Error: std::fmt::Display + Send + Sync + 'static;

    /// Run this stage.
    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>>;
}

/// The terminal stage: wraps a [`Provider`] and is the only stage that ever
/// performs a real provider call.
pub struct Terminal<P> {
    provider: P,
}

impl<P: Provider> Terminal<P> {
    /// Wrap `provider` as a terminal stage.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Borrow the wrapped provider, e.g. to read its name.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: Provider> Stage for Terminal<P> {
    type Error = P::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        if let Some(hooks) = ctx.hooks {
            hooks.emit(crate::hooks::HookEvent::ProviderCallStarted {
                request_id: ctx.request_id.to_string(),
                provider: self.provider.name().to_string(),
                attempt: 1,
            });
        }
        match self.provider.call(messages, temperature).await {
            Ok(resp) => {
                if let Some(hooks) = ctx.hooks {
                    hooks.emit(crate::hooks::HookEvent::ProviderCallCompleted {
                        request_id: ctx.request_id.to_string(),
                        provider: self.provider.name().to_string(),
                        attempt: 1,
                        usage: resp.usage,
                    });
                }
                Ok(resp)
            }
            Err(e) => {
                if let Some(hooks) = ctx.hooks {
                    hooks.emit(crate::hooks::HookEvent::ProviderCallFailed {
                        request_id: ctx.request_id.to_string(),
                        provider: self.provider.name().to_string(),
                        attempt: 1,
                        error_kind: "provider_error",
                    });
                }
                Err(OrchestratorError::Provider(e))
            }
        }
    }
}
