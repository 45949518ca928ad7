//! The `classification` synapse: assign `input` to one of a fixed set of
//! categories.

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

/// The decoded result of a `classification` call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClassificationResponse {
    /// The chosen category, required, from the offered list.
    pub primary: String,
    /// A second, less confident category from the offered list, or empty
    /// if none applies.
    #[serde(default)]
    pub secondary: String,
    /// Model-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Ordered steps explaining the choice. Non-empty.
    pub reasoning: Vec<String>,
}

impl Described for ClassificationResponse {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("primary", string())
            .optional_property("secondary", string())
            .required_property("confidence", number())
            .required_property("reasoning", array(string()))
            .build()
    }
}

impl ClassificationResponse {
    fn validate_against(&self, categories: &[String]) -> Result<(), String> {
        if !categories.iter().any(|c| c == &self.primary) {
            return Err(format!("primary '{}' is not one of the offered categories", self.primary));
        }
        if !self.secondary.is_empty() && !categories.iter().any(|c| c == &self.secondary) {
            return Err(format!(
                "secondary '{}' is not one of the offered categories",
                self.secondary
            ));
        }
        Ok(())
    }
}

impl Validate for ClassificationResponse {
    fn validate(&self) -> Result<(), String> {
        if self.primary.is_empty() {
            return Err("primary must not be empty".into());
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

/// Assign `input` to one (or two) of `categories`.
pub struct Classification<S> {
    service: Service<S>,
}

impl<S: Stage> Classification<S> {
    /// Wrap a [`Service`] as a `classification` façade.
    pub fn new(service: Service<S>) -> Self {
        Self { service }
    }

    /// Classify `input` into one of `categories`. The decoded `primary`
    /// (and `secondary`, if present) are additionally checked to be drawn
    /// from `categories`, since the base [`Validate`] impl alone has no
    /// access to the offered list.
    pub async fn call(
        &self,
        task: impl Into<String>,
        input: impl Into<String>,
        categories: Vec<String>,
        temperature: f32,
    ) -> Result<ClassificationResponse, OrchestratorError<S::Error>> {
        let prompt = Prompt {
            task: task.into(),
            input: input.into(),
            categories: categories.clone(),
            schema: ClassificationResponse::schema_string(),
            constraints: vec![
                "primary: required, from categories list".into(),
                "secondary: optional, from categories list or empty string".into(),
            ],
            ..Default::default()
        };
        self.service
            .execute_checked::<ClassificationResponse>(
                "classification",
                prompt,
                temperature,
                CREATIVE_TEMPERATURE,
                |resp| resp.validate_against(&categories),
            )
            .await
    }
}
