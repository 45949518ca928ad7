//! Observability hooks.
//!
//! [`HookSink`] is emit-only and additive: every emission point here also
//! carries a matching `tracing` event, so a caller with no [`HookSink`]
//! attached still gets the usual log output.

use crate::message::Usage;

/// One of the seven signals the orchestration layer emits.
#[derive(Debug, Clone)]
pub enum HookEvent {
    /// A [`Service`](crate::service::Service) execution began, before the
    /// pipeline is invoked.
    RequestStarted {
        /// The generated request id for this execution.
        request_id: String,
        /// The session this execution runs against.
        session_id: String,
        /// The synapse façade name, e.g. `"binary"`.
        synapse: &'static str,
        /// The resolved (non-sentinel) temperature used for this call.
        temperature: f32,
    },
    /// The execution finished successfully and was committed.
    RequestCompleted {
        /// The request id from the matching [`HookEvent::RequestStarted`].
        request_id: String,
        /// The session this execution ran against.
        session_id: String,
        /// The synapse façade name.
        synapse: &'static str,
        /// Usage reported by the provider for this call.
        usage: Usage,
        /// The re-marshalled typed response value, as JSON.
        output: String,
    },
    /// The execution failed for any reason and nothing was committed.
    RequestFailed {
        /// The request id from the matching [`HookEvent::RequestStarted`].
        request_id: String,
        /// The session this execution ran against.
        session_id: String,
        /// The synapse façade name.
        synapse: &'static str,
        /// [`OrchestratorError::kind_tag`](crate::error::OrchestratorError::kind_tag).
        error_kind: &'static str,
    },
    /// A pipeline stage is about to invoke the provider.
    ProviderCallStarted {
        /// The request id this call belongs to.
        request_id: String,
        /// The provider's name.
        provider: String,
        /// 1-indexed attempt number within the Retry operator, if any.
        attempt: u32,
    },
    /// A provider call returned successfully.
    ProviderCallCompleted {
        /// The request id this call belongs to.
        request_id: String,
        /// The provider's name.
        provider: String,
        /// 1-indexed attempt number within the Retry operator, if any.
        attempt: u32,
        /// Usage reported for this specific call.
        usage: Usage,
    },
    /// A provider call returned an error.
    ProviderCallFailed {
        /// The request id this call belongs to.
        request_id: String,
        /// The provider's name.
        provider: String,
        /// 1-indexed attempt number within the Retry operator, if any.
        attempt: u32,
        /// [`OrchestratorError::kind_tag`](crate::error::OrchestratorError::kind_tag).
        error_kind: &'static str,
    },
    /// The provider succeeded but the content failed to decode or
    /// `validate()`, before any session commit.
    ResponseFailed {
        /// The request id this response belongs to.
        request_id: String,
        /// A human-readable reason, e.g. a serde error or a `validate()`
        /// failure message.
        reason: String,
    },
}

/// An emit-only sink for [`HookEvent`]s.
///
/// Every method has a no-op default so implementors only override the
/// signals they care about. Implementations must not block the caller for
/// long -- forward to a channel rather than doing I/O inline.
pub trait HookSink: Send + Sync {
    /// Receive one event. The default implementation discards it.
    fn emit(&self, _event: HookEvent) {}
}

/// A [`HookSink`] that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHookSink;

impl HookSink for NoopHookSink {}
