//! The `convert` synapse: reshape `input` into a caller-defined structured
//! value (as opposed to [`Extraction`](super::Extraction), which only
//! pulls out what is already present).

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

/// Convert `input` into a `T`. `T` supplies its own schema via
/// [`Described`] and its own post-decode checks via [`Validate`].
pub struct Convert<S, T> {
    service: Service<S>,
    _marker: PhantomData<fn() -> T>,
}

impl<S: Stage, T: DeserializeOwned + Validate + Described + Serialize> Convert<S, T> {
    /// Wrap a [`Service`] as a `convert` façade over `T`.
    pub fn new(service: Service<S>) -> Self {
        Self {
            service,
            _marker: PhantomData,
        }
    }

    /// Convert `input` into `T`, optionally with extra `context`.
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
            ..Default::default()
        };
        self.service
            .execute("convert", prompt, temperature, DETERMINISTIC_TEMPERATURE)
            .await
    }
}
