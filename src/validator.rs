//! The [`Validate`] capability: post-decode, pre-commit checks on a typed
//! response.

/// A type decoded from a provider's raw JSON content that can check its own
/// semantic validity beyond what JSON Schema / `serde` already enforce.
///
/// [`Service`](crate::service::Service) calls `validate()` immediately after
/// a successful decode and turns a failure into
/// [`OrchestratorError::InvalidResponse`](crate::error::OrchestratorError::InvalidResponse)
/// without committing anything to the session.
pub trait Validate {
    /// Checks invariants the type's own shape cannot express, e.g. "`score`
    /// is within `0.0..=1.0`" or "`rank` is a permutation of the input
    /// indices". Returns a human-readable reason on failure.
    fn validate(&self) -> Result<(), String>;
}
