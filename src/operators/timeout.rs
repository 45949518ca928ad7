//! The Timeout operator: bounds how long an inner stage is allowed to run.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Wraps an inner [`Stage`] and fails with
/// [`OrchestratorError::Cancelled`] if it has not completed within
/// `duration`.
///
/// The inner call is not cancelled cooperatively -- it is dropped, which
/// stops polling it but does not guarantee any in-flight I/O it started is
/// aborted. Callers relying on true cancellation need a provider whose
/// future honors drop.
pub struct Timeout<S> {
    inner: S,
    duration: Duration,
}

impl<S: Stage> Timeout<S> {
    /// Wrap `inner`, bounding it to `duration`.
    pub fn new(inner: S, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

#[async_trait]
impl<S: Stage> Stage for Timeout<S> {
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        match tokio::time::timeout(self.duration, self.inner.call(ctx, messages, temperature))
            .await
        {
            Ok(result) => result,
            Err(_elapsed) => Err(OrchestratorError::Cancelled),
        }
    }
}
