//! Error kinds for the orchestration pipeline.
//!
//! [`OrchestratorError`] is generic over the caller's [`Provider`](crate::provider::Provider)
//! error type so the pipeline never forces a particular HTTP/transport error
//! shape on callers -- concrete provider adapters are an external concern.
//! All operations in this crate return [`Result<T, E>`].

use thiserror::Error;

/// Errors surfaced by the pipeline, the [`Service`](crate::service::Service),
/// and the synapse façades.
///
/// `E` is the error type returned by the caller's [`Provider`](crate::provider::Provider)
/// implementation.
#[derive(Error, Debug)]
pub enum OrchestratorError<E> {
    /// The prompt failed validation, or a caller-supplied parameter violated
    /// its contract (e.g. a negative prune count). Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The provider returned a failure. Retryable subject to operator policy.
    #[error("provider error: {0}")]
    Provider(E),

    /// The context was cancelled or a timeout expired.
    #[error("cancelled")]
    Cancelled,

    /// A circuit breaker short-circuited the call without invoking inner.
    #[error("circuit open")]
    CircuitOpen,

    /// A rate limiter refused the call, or the caller abandoned waiting.
    #[error("rate limited")]
    RateLimited,

    /// The provider returned success but with empty content.
    #[error("empty response")]
    EmptyResponse,

    /// The raw response could not be decoded as JSON.
    #[error("parse error: {0}")]
    ParseError(String),

    /// The decoded response failed `Validate()`.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Both the primary and the fallback service failed.
    #[error("fallback exhausted: primary=[{primary}] fallback=[{fallback}]")]
    FallbackExhausted {
        /// Formatted cause from the primary pipeline.
        primary: String,
        /// Formatted cause from the fallback pipeline.
        fallback: String,
    },
}

/// A convenience alias for pipeline operations.
pub type Result<T, E> = std::result::Result<T, OrchestratorError<E>>;

impl<E> OrchestratorError<E> {
    /// The stable error-kind tag attached to hook payloads (spec'd field
    /// `error.type`), e.g. `"parse_error"`, `"validation_error"`.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Provider(_) => "provider_error",
            Self::Cancelled => "cancelled",
            Self::CircuitOpen => "circuit_open",
            Self::RateLimited => "rate_limited",
            Self::EmptyResponse => "empty_response",
            Self::ParseError(_) => "parse_error",
            Self::InvalidResponse(_) => "validation_error",
            Self::FallbackExhausted { .. } => "fallback_exhausted",
        }
    }

    /// `true` for kinds the Retry/Backoff operators are allowed to recover
    /// from -- provider errors only (spec section 7's propagation policy).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// `true` for kinds that count as a failure toward tripping a
    /// [`CircuitBreaker`](crate::operators::CircuitBreaker) -- provider
    /// errors and cancellations, since both indicate the downstream
    /// collaborator is unhealthy. Caller errors (`InvalidInput`,
    /// `InvalidResponse`, `ParseError`) never count.
    pub fn is_circuit_eligible(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct TestProviderError;

    #[test]
    fn display_invalid_input() {
        let err: OrchestratorError<TestProviderError> =
            OrchestratorError::InvalidInput("task is empty".into());
        assert_eq!(err.to_string(), "invalid input: task is empty");
    }

    #[test]
    fn display_provider_wraps_inner() {
        let err = OrchestratorError::Provider(TestProviderError);
        assert_eq!(err.to_string(), "provider error: boom");
    }

    #[test]
    fn kind_tags() {
        assert_eq!(
            OrchestratorError::<TestProviderError>::InvalidInput(String::new()).kind_tag(),
            "invalid_input"
        );
        assert_eq!(
            OrchestratorError::Provider(TestProviderError).kind_tag(),
            "provider_error"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::Cancelled.kind_tag(),
            "cancelled"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::CircuitOpen.kind_tag(),
            "circuit_open"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::RateLimited.kind_tag(),
            "rate_limited"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::EmptyResponse.kind_tag(),
            "empty_response"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::ParseError(String::new()).kind_tag(),
            "parse_error"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::InvalidResponse(String::new()).kind_tag(),
            "validation_error"
        );
        assert_eq!(
            OrchestratorError::<TestProviderError>::FallbackExhausted {
                primary: String::new(),
                fallback: String::new()
            }
            .kind_tag(),
            "fallback_exhausted"
        );
    }

    #[test]
    fn only_provider_errors_are_retryable() {
        assert!(OrchestratorError::Provider(TestProviderError).is_retryable());
        assert!(!OrchestratorError::<TestProviderError>::Cancelled.is_retryable());
        assert!(!OrchestratorError::<TestProviderError>::CircuitOpen.is_retryable());
        assert!(!OrchestratorError::<TestProviderError>::RateLimited.is_retryable());
        assert!(!OrchestratorError::<TestProviderError>::InvalidInput(String::new())
            .is_retryable());
    }

    #[test]
    fn circuit_eligible_includes_cancelled() {
        assert!(OrchestratorError::Provider(TestProviderError).is_circuit_eligible());
        assert!(OrchestratorError::<TestProviderError>::Cancelled.is_circuit_eligible());
        assert!(!OrchestratorError::<TestProviderError>::RateLimited.is_circuit_eligible());
        assert!(!OrchestratorError::<TestProviderError>::InvalidInput(String::new())
            .is_circuit_eligible());
    }
}
