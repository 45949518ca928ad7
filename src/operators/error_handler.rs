//! The Error Handler operator: an observer that reacts to a failure without
//! changing it.

use async_trait::async_trait;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Wraps an inner [`Stage`] and invokes `on_error` for every failure it
/// produces, then returns that failure unchanged.
///
/// Unlike [`Fallback`](super::Fallback), `ErrorHandler` never recovers --
/// it exists purely for side effects (alerting, metrics, structured
/// logging beyond the crate's own `tracing` calls).
pub struct ErrorHandler<S, F> {
    inner: S,
    on_error: F,
}

impl<S, F> ErrorHandler<S, F>
where
    S: Stage,
    F: Fn(&OrchestratorError<S::Error>) + Send + Sync,
{
    /// Wrap `inner`, invoking `on_error` on every failure.
    pub fn new(inner: S, on_error: F) -> Self {
        Self { inner, on_error }
    }
}

#[async_trait]
impl<S, F> Stage for ErrorHandler<S, F>
where
    S: Stage,
    F: Fn(&OrchestratorError<S::Error>) + Send + Sync,
{
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        match self.inner.call(ctx, messages, temperature).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                (self.on_error)(&e);
                Err(e)
            }
        }
    }
}
