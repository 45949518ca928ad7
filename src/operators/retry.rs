//! The Retry operator: immediate re-invocation of a retryable failure, no
//! delay between attempts.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Configuration for [`Retry`].
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total number of attempts, including the first -- not the number of
    /// *retries*. `max_attempts: 1` disables retrying entirely.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Wraps an inner [`Stage`] and re-invokes it immediately on a retryable
/// failure, up to `config.max_attempts` total attempts.
///
/// Only errors for which [`OrchestratorError::is_retryable`] returns `true`
/// are retried; every other error kind is returned on the first attempt.
pub struct Retry<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: Stage> Retry<S> {
    /// Wrap `inner` with the given retry policy.
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl<S: Stage> Stage for Retry<S> {
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 1..=max_attempts {
            match self.inner.call(ctx, messages, temperature).await {
                Ok(resp) => {
                    if attempt > 1 {
                        debug!(attempt, "retry succeeded");
                    }
                    return Ok(resp);
                }
                Err(e) => {
                    if !e.is_retryable() || attempt == max_attempts {
                        return Err(e);
                    }
                    warn!(attempt, "retrying after retryable error");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.expect("loop always runs at least once"))
    }
}
