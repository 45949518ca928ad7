//! The `transform` synapse: rewrite `input` subject to a list of rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::pipeline::Stage;
use crate::prompt::Prompt;
use crate::schema::{array, number, string, Described, SchemaBuilder};
use crate::service::Service;
use crate::synapse::CREATIVE_TEMPERATURE;
use crate::temperature;
use crate::validator::Validate;

/// The decoded result of a `transform` call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransformResponse {
    /// The rewritten text.
    pub output: String,
    /// Model-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Notable edits made relative to the input. May be empty if the
    /// rewrite left the substance unchanged.
    #[serde(default)]
    pub changes: Vec<String>,
    /// Ordered steps explaining the rewrite. Non-empty.
    pub reasoning: Vec<String>,
}

impl Described for TransformResponse {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("output", string())
            .required_property("confidence", number())
            .optional_property("changes", array(string()))
            .required_property("reasoning", array(string()))
            .build()
    }
}

impl Validate for TransformResponse {
    fn validate(&self) -> Result<(), String> {
        if self.output.is_empty() {
            return Err("output must not be empty".into());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} out of range [0.0, 1.0]",
                self.confidence
            ));
        }
        if self.reasoning.is_empty() {
            return Err("reasoning must not be empty".into());
        }
        Ok(())
    }
}

/// Rewrite `input` according to `task` and `constraints`.
pub struct Transform<S> {
    service: Service<S>,
}

impl<S: Stage> Transform<S> {
    /// Wrap a [`Service`] as a `transform` façade.
    pub fn new(service: Service<S>) -> Self {
        Self { service }
    }

    /// Rewrite `input`, subject to `constraints` (e.g. "keep under 280
    /// characters", "use a formal tone").
    pub async fn call(
        &self,
        task: impl Into<String>,
        input: impl Into<String>,
        constraints: Vec<String>,
        temperature: f32,
    ) -> Result<TransformResponse, OrchestratorError<S::Error>> {
        let mut constraints = constraints;
        constraints.push("confidence: 0.0 to 1.0".into());
        constraints.push("reasoning: ordered steps explaining the rewrite".into());
        let prompt = Prompt {
            task: task.into(),
            input: input.into(),
            constraints,
            schema: TransformResponse::schema_string(),
            ..Default::default()
        };
        self.service
            .execute("transform", prompt, temperature, CREATIVE_TEMPERATURE)
            .await
    }
}
