//! The Fallback operator: falls through to a secondary stage when the
//! primary fails.

use async_trait::async_trait;
use tracing::warn;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Wraps a primary and a fallback [`Stage`], which may be backed by
/// entirely different providers (and therefore different error types).
///
/// If the primary fails, the fallback is tried once. If both fail, the
/// result is
/// [`OrchestratorError::FallbackExhausted`] carrying both causes rendered
/// to strings -- the two stages are not required to share an error type,
/// so the combined error can no longer carry either as a typed value.
pub struct Fallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Stage, F: Stage> Fallback<P, F> {
    /// Wrap `primary` and `fallback`.
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: Stage, F: Stage> Stage for Fallback<P, F> {
    type Error = P::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        match self.primary.call(ctx, messages, temperature).await {
            Ok(resp) => Ok(resp),
            Err(primary_err) => {
                warn!(cause = %primary_err, "primary failed, trying fallback");
                match self.fallback.call(ctx, messages, temperature).await {
                    Ok(resp) => Ok(resp),
                    Err(fallback_err) => Err(OrchestratorError::FallbackExhausted {
                        primary: primary_err.to_string(),
                        fallback: fallback_err.to_string(),
                    }),
                }
            }
        }
    }
}
