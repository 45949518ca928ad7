//! The Backoff operator: retries a retryable failure with exponentially
//! increasing delay between attempts.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Configuration for [`Backoff`].
#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt. Each subsequent delay doubles:
    /// the delay before attempt `k` (`k >= 2`) is `base_delay * 2^(k-2)`.
    pub base_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

/// Wraps an inner [`Stage`] and retries a retryable failure after an
/// exponentially increasing delay, up to `config.max_attempts` total
/// attempts.
///
/// Where [`Retry`](super::Retry) retries immediately, `Backoff` sleeps
/// between attempts -- use whichever (or compose both) fits the inner
/// stage's failure characteristics.
pub struct Backoff<S> {
    inner: S,
    config: BackoffConfig,
}

impl<S: Stage> Backoff<S> {
    /// Wrap `inner` with the given backoff policy.
    pub fn new(inner: S, config: BackoffConfig) -> Self {
        Self { inner, config }
    }

    fn delay_before_attempt(&self, attempt: u32) -> Duration {
        debug_assert!(attempt >= 2);
        self.config.base_delay * 2u32.pow(attempt - 2)
    }
}

#[async_trait]
impl<S: Stage> Stage for Backoff<S> {
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.inner.call(ctx, messages, temperature).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if !e.is_retryable() || attempt == max_attempts {
                        return Err(e);
                    }
                    let delay = self.delay_before_attempt(attempt + 1);
                    warn!(attempt, ?delay, "backing off after retryable error");
                    tokio::time::sleep(delay).await;
                }
            }
        }

        unreachable!("loop always returns on its final iteration")
    }
}
