//! The Rate Limit operator: a token bucket guarding an inner stage.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Configuration for [`RateLimit`].
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Bucket capacity -- the maximum number of calls that may burst
    /// through before the limiter starts refusing.
    pub max_tokens: u32,
    /// Time to accrue a single replacement token.
    pub refill_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_tokens: 10,
            refill_interval: Duration::from_millis(100),
        }
    }
}

struct TokenBucket {
    tokens: u32,
    last_refill: Instant,
}

/// Wraps an inner [`Stage`] with a token-bucket rate limiter. A call that
/// finds the bucket empty fails immediately with
/// [`OrchestratorError::RateLimited`] rather than queuing.
pub struct RateLimit<S> {
    inner: S,
    config: RateLimitConfig,
    bucket: Mutex<TokenBucket>,
}

impl<S: Stage> RateLimit<S> {
    /// Wrap `inner`, starting with a full bucket.
    pub fn new(inner: S, config: RateLimitConfig) -> Self {
        Self {
            inner,
            bucket: Mutex::new(TokenBucket {
                tokens: config.max_tokens,
                last_refill: Instant::now(),
            }),
            config,
        }
    }

    fn refill(&self, bucket: &mut TokenBucket) {
        let elapsed = bucket.last_refill.elapsed();
        let accrued = (elapsed.as_nanos() / self.config.refill_interval.as_nanos().max(1)) as u32;
        if accrued > 0 {
            bucket.tokens = (bucket.tokens + accrued).min(self.config.max_tokens);
            bucket.last_refill += self.config.refill_interval * accrued;
        }
    }
}

#[async_trait]
impl<S: Stage> Stage for RateLimit<S> {
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        {
            let mut bucket = self.bucket.lock().await;
            self.refill(&mut bucket);
            if bucket.tokens == 0 {
                return Err(OrchestratorError::RateLimited);
            }
            bucket.tokens -= 1;
        }

        self.inner.call(ctx, messages, temperature).await
    }
}
