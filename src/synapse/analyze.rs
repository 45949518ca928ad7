//! The `analyze` synapse: surface structured findings from free-form input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::pipeline::Stage;
use crate::prompt::Prompt;
use crate::schema::{array, number, string, Described, SchemaBuilder};
use crate::service::Service;
use crate::synapse::{merge_inputs, BALANCED_TEMPERATURE};
use crate::temperature;
use crate::validator::Validate;

/// The decoded result of an `analyze` call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalyzeResponse {
    /// A one-paragraph analysis.
    pub analysis: String,
    /// Individual findings, most significant first. Non-empty.
    pub findings: Vec<String>,
    /// Model-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Ordered steps explaining the findings. Non-empty.
    pub reasoning: Vec<String>,
}

impl Described for AnalyzeResponse {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("analysis", string())
            .required_property("findings", array(string()))
            .required_property("confidence", number())
            .required_property("reasoning", array(string()))
            .build()
    }
}

impl Validate for AnalyzeResponse {
    fn validate(&self) -> Result<(), String> {
        if self.analysis.is_empty() {
            return Err("analysis must not be empty".into());
        }
        if self.findings.is_empty() {
            return Err("findings must not be empty".into());
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

/// Produce an analysis and a list of findings from `input`, optionally with
/// extra `context`.
pub struct Analyze<S> {
    service: Service<S>,
}

impl<S: Stage> Analyze<S> {
    /// Wrap a [`Service`] as an `analyze` façade.
    pub fn new(service: Service<S>) -> Self {
        Self { service }
    }

    /// Analyze `input`, merging in `context` if non-empty.
    pub async fn call(
        &self,
        task: impl Into<String>,
        input: &str,
        context: &str,
        temperature: f32,
    ) -> Result<AnalyzeResponse, OrchestratorError<S::Error>> {
        let prompt = Prompt {
            task: task.into(),
            input: merge_inputs(&[input, context]),
            schema: AnalyzeResponse::schema_string(),
            constraints: vec![
                "confidence: 0.0 to 1.0".into(),
                "reasoning: ordered steps explaining findings".into(),
            ],
            ..Default::default()
        };
        self.service
            .execute("analyze", prompt, temperature, BALANCED_TEMPERATURE)
            .await
    }
}
