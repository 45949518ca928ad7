//! The Debug operator: verbose tracing around an inner stage, with no
//! effect on behavior.

use async_trait::async_trait;
use tracing::debug;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Wraps an inner [`Stage`] and emits a `tracing::debug!` event before and
/// after each call, including the rendered message count and temperature.
/// Intended for local development, not production log volume.
pub struct Debug<S> {
    inner: S,
    label: String,
}

impl<S: Stage> Debug<S> {
    /// Wrap `inner`, tagging its trace events with `label`.
    pub fn new(inner: S, label: impl Into<String>) -> Self {
        Self {
            inner,
            label: label.into(),
        }
    }
}

#[async_trait]
impl<S: Stage> Stage for Debug<S> {
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        debug!(
            label = %self.label,
            request_id = ctx.request_id,
            message_count = messages.len(),
            temperature,
            "stage call starting"
        );
        let result = self.inner.call(ctx, messages, temperature).await;
        match &result {
            Ok(resp) => debug!(label = %self.label, content_len = resp.content.len(), "stage call succeeded"),
            Err(e) => debug!(label = %self.label, error = %e, "stage call failed"),
        }
        result
    }
}
