//! The `extraction` synapse: pull a caller-defined structured value out of
//! free-form input.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::OrchestratorError;
use crate::pipeline::Stage;
use crate::prompt::Prompt;
use crate::schema::Described;
use crate::service::Service;
use crate::synapse::{merge_inputs, DETERMINISTIC_TEMPERATURE};
use crate::validator::Validate;

/// Extract a `T` from `input`. `T` supplies its own schema via
/// [`Described`] and its own post-decode checks via [`Validate`].
pub struct Extraction<S, T> {
    service: Service<S>,
    _marker: PhantomData<fn() -> T>,
}

impl<S: Stage, T: DeserializeOwned + Validate + Described + Serialize> Extraction<S, T> {
    /// Wrap a [`Service`] as an `extraction` façade over `T`.
    pub fn new(service: Service<S>) -> Self {
        Self {
            service,
            _marker: PhantomData,
        }
    }

    /// Extract `T` from `input`, optionally with extra `context`.
    pub async fn call(
        &self,
        task: impl Into<String>,
        input: &str,
        context: &str,
        temperature: f32,
    ) -> Result<T, OrchestratorError<S::Error>> {
        let prompt = Prompt {
            task: task.into(),
            input: merge_inputs(&[input, context]),
            schema: T::schema_string(),
            constraints: vec!["Extract only fields explicitly present or inferable from the input.".into()],
            ..Default::default()
        };
        self.service
            .execute("extraction", prompt, temperature, DETERMINISTIC_TEMPERATURE)
            .await
    }
}
