//! The `binary` synapse: a yes/no decision over free-form input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::pipeline::Stage;
use crate::prompt::Prompt;
use crate::schema::{array, boolean, number, string, Described, SchemaBuilder};
use crate::service::Service;
use crate::synapse::DETERMINISTIC_TEMPERATURE;
use crate::temperature;
use crate::validator::Validate;

/// The decoded result of a `binary` call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BinaryResponse {
    /// The yes/no decision.
    pub decision: bool,
    /// Model-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Ordered steps explaining the decision. Non-empty.
    pub reasoning: Vec<String>,
}

impl Described for BinaryResponse {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("decision", boolean())
            .required_property("confidence", number())
            .required_property("reasoning", array(string()))
            .build()
    }
}

impl Validate for BinaryResponse {
    fn validate(&self) -> Result<(), String> {
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

/// Determine whether `input` satisfies `task`, a plain yes/no question.
pub struct Binary<S> {
    service: Service<S>,
}

impl<S: Stage> Binary<S> {
    /// Wrap a [`Service`] as a `binary` façade.
    pub fn new(service: Service<S>) -> Self {
        Self { service }
    }

    /// Ask a yes/no question about `input`.
    ///
    /// `temperature` may be [`temperature::UNSET`] to use this synapse's
    /// default.
    pub async fn call(
        &self,
        task: impl Into<String>,
        input: impl Into<String>,
        temperature: f32,
    ) -> Result<BinaryResponse, OrchestratorError<S::Error>> {
        let prompt = Prompt {
            task: task.into(),
            input: input.into(),
            schema: BinaryResponse::schema_string(),
            constraints: vec![
                "decision: true or false only".into(),
                "confidence: 0.0 to 1.0".into(),
                "reasoning: ordered steps explaining decision".into(),
            ],
            ..Default::default()
        };
        self.service
            .execute("binary", prompt, temperature, DETERMINISTIC_TEMPERATURE)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Terminal;
    use crate::session::Session;
    use crate::testing::ScriptedProvider;
    use std::sync::Arc;

    #[test]
    fn validate_rejects_out_of_range_confidence() {
        let resp = BinaryResponse {
            decision: true,
            confidence: 1.2,
            reasoning: vec!["because".into()],
        };
        assert!(resp.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_reasoning() {
        let resp = BinaryResponse {
            decision: true,
            confidence: 0.5,
            reasoning: vec![],
        };
        assert!(resp.validate().is_err());
    }

    #[tokio::test]
    async fn call_decodes_decision() {
        let provider = ScriptedProvider::succeeding(
            "p",
            r#"{"decision":true,"confidence":0.9,"reasoning":["matches keyword list"]}"#,
        );
        let binary = Binary::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let resp = binary
            .call("Is this spam?", "buy now!!!", temperature::UNSET)
            .await
            .unwrap();
        assert!(resp.decision);
        assert_eq!(resp.confidence, 0.9);
    }

    #[tokio::test]
    async fn call_rejects_missing_reasoning() {
        let provider =
            ScriptedProvider::succeeding("p", r#"{"decision":true,"confidence":0.9,"reasoning":[]}"#);
        let binary = Binary::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let result = binary
            .call("Is this spam?", "buy now!!!", temperature::UNSET)
            .await;
        assert!(matches!(result, Err(OrchestratorError::InvalidResponse(_))));
    }
}
