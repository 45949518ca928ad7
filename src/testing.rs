//! In-memory [`Provider`] test double used by this crate's own test suite.
//!
//! Concrete network-backed providers are out of scope for this crate; a
//! caller wiring up real providers is expected to write their own adapter
//! against [`Provider`] and can use the same pattern for their own tests.

use async_trait::async_trait;
use std::sync::Mutex;

use thiserror::Error;

use crate::message::{Message, Usage};
use crate::provider::{Provider, ProviderResponse};

/// The error type returned by [`ScriptedProvider`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ScriptedError(pub String);

/// One scripted outcome for a single [`ScriptedProvider::call`] invocation.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return `content` with zeroed usage.
    Ok(String),
    /// Return `content` with the given usage.
    OkWithUsage(String, Usage),
    /// Fail with the given message.
    Err(String),
    /// Block until the caller's timeout/cancellation fires. Simulated with
    /// a long sleep rather than never resolving, so a runaway test still
    /// terminates.
    Hang,
}

/// A [`Provider`] that returns a pre-scripted, ordered sequence of
/// outcomes -- one per call. Calling it more times than it was scripted for
/// panics, surfacing test setup bugs immediately rather than hanging.
pub struct ScriptedProvider {
    name: String,
    script: Mutex<Vec<Scripted>>,
    calls: Mutex<Vec<(Vec<Message>, f32)>>,
}

impl ScriptedProvider {
    /// Construct a provider that yields each element of `script` in order,
    /// one per call.
    pub fn new(name: impl Into<String>, script: Vec<Scripted>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Construct a provider whose every call succeeds with `content`. A
    /// single-element script repeats forever rather than being consumed
    /// (see [`ScriptedProvider::call`]).
    pub fn succeeding(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, vec![Scripted::Ok(content.into())])
    }

    /// Construct a provider whose every call fails with `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, vec![Scripted::Err(message.into())])
    }

    /// The recorded `(messages, temperature)` pairs from every call so far.
    pub fn calls(&self) -> Vec<(Vec<Message>, f32)> {
        self.calls.lock().unwrap().clone()
    }

    /// The number of times `call` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    type Error = ScriptedError;

    fn name(&self) -> &str {
        &self.name
    }

    async fn call(
        &self,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), temperature));

        let mut script = self.script.lock().unwrap();
        let outcome = if script.is_empty() {
            panic!("ScriptedProvider {} called more times than scripted", self.name);
        } else if script.len() == 1 {
            script[0].clone()
        } else {
            script.remove(0)
        };
        drop(script);

        match outcome {
            Scripted::Ok(content) => Ok(ProviderResponse {
                content,
                usage: Usage::default(),
            }),
            Scripted::OkWithUsage(content, usage) => Ok(ProviderResponse { content, usage }),
            Scripted::Err(message) => Err(ScriptedError(message)),
            Scripted::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                unreachable!("ScriptedProvider::Hang should be pre-empted by a timeout")
            }
        }
    }
}
