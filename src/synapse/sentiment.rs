//! The `sentiment` synapse: score `input` along a fixed set of aspects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::pipeline::Stage;
use crate::prompt::Prompt;
use crate::schema::{array, number, string, string_enum, Described, SchemaBuilder};
use crate::service::Service;
use crate::synapse::BALANCED_TEMPERATURE;
use crate::temperature;
use crate::validator::Validate;

/// The overall sentiment label, or the label attached to one aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl SentimentLabel {
    const VARIANTS: &'static [&'static str] = &["positive", "negative", "neutral", "mixed"];
}

/// The three fixed sentiment scores, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// The decoded result of a `sentiment` call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SentimentResponse {
    /// The overall sentiment across the whole input.
    pub overall: SentimentLabel,
    /// Model-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Positive/negative/neutral scores, each in `[0.0, 1.0]`.
    pub scores: SentimentScores,
    /// Per-aspect sentiment label, keyed by the offered aspect.
    #[serde(default)]
    pub aspects: BTreeMap<String, String>,
    /// Named emotions detected in the input.
    #[serde(default)]
    pub emotions: Vec<String>,
    /// Ordered steps explaining the scoring. Non-empty.
    pub reasoning: Vec<String>,
}

impl Described for SentimentResponse {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("overall", string_enum(SentimentLabel::VARIANTS))
            .required_property("confidence", number())
            .required_property(
                "scores",
                SchemaBuilder::object()
                    .required_property("positive", number())
                    .required_property("negative", number())
                    .required_property("neutral", number())
                    .build(),
            )
            .optional_property(
                "aspects",
                serde_json::json!({"type": "object", "additionalProperties": string_enum(SentimentLabel::VARIANTS)}),
            )
            .optional_property("emotions", array(string()))
            .required_property("reasoning", array(string()))
            .build()
    }
}

impl Validate for SentimentResponse {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} out of range [0.0, 1.0]",
                self.confidence
            ));
        }
        for (label, score) in [
            ("positive", self.scores.positive),
            ("negative", self.scores.negative),
            ("neutral", self.scores.neutral),
        ] {
            if !(0.0..=1.0).contains(&score) {
                return Err(format!("score '{label}' {score} out of range [0.0, 1.0]"));
            }
        }
        for (aspect, label) in &self.aspects {
            if !SentimentLabel::VARIANTS.contains(&label.as_str()) {
                return Err(format!("aspect '{aspect}' has unknown sentiment label '{label}'"));
            }
        }
        if self.reasoning.is_empty() {
            return Err("reasoning must not be empty".into());
        }
        Ok(())
    }
}

impl SentimentResponse {
    fn validate_covers(&self, aspects: &[String]) -> Result<(), String> {
        for aspect in aspects {
            if !self.aspects.contains_key(aspect) {
                return Err(format!("missing sentiment label for aspect '{aspect}'"));
            }
        }
        Ok(())
    }
}

/// Score `input` along each of `aspects`.
pub struct Sentiment<S> {
    service: Service<S>,
}

impl<S: Stage> Sentiment<S> {
    /// Wrap a [`Service`] as a `sentiment` façade.
    pub fn new(service: Service<S>) -> Self {
        Self { service }
    }

    /// Score `input` along `aspects`. Every aspect must appear in the
    /// decoded response's `aspects` map.
    pub async fn call(
        &self,
        task: impl Into<String>,
        input: impl Into<String>,
        aspects: Vec<String>,
        temperature: f32,
    ) -> Result<SentimentResponse, OrchestratorError<S::Error>> {
        let prompt = Prompt {
            task: task.into(),
            input: input.into(),
            aspects: aspects.clone(),
            schema: SentimentResponse::schema_string(),
            constraints: vec![
                "overall: positive, negative, neutral, or mixed".into(),
                "scores: positive, negative, neutral, each 0.0 to 1.0".into(),
                "aspects: a sentiment label for every aspect listed above".into(),
            ],
            ..Default::default()
        };
        self.service
            .execute_checked::<SentimentResponse>(
                "sentiment",
                prompt,
                temperature,
                BALANCED_TEMPERATURE,
                |resp| resp.validate_covers(&aspects),
            )
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

    fn scores() -> SentimentScores {
        SentimentScores {
            positive: 0.7,
            negative: 0.1,
            neutral: 0.2,
        }
    }

    #[test]
    fn validate_rejects_out_of_range_score() {
        let resp = SentimentResponse {
            overall: SentimentLabel::Positive,
            confidence: 0.8,
            scores: SentimentScores {
                positive: 2.0,
                ..scores()
            },
            aspects: BTreeMap::new(),
            emotions: vec![],
            reasoning: vec!["because".into()],
        };
        assert!(resp.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_reasoning() {
        let resp = SentimentResponse {
            overall: SentimentLabel::Mixed,
            confidence: 0.5,
            scores: scores(),
            aspects: BTreeMap::new(),
            emotions: vec![],
            reasoning: vec![],
        };
        assert!(resp.validate().is_err());
    }

    #[tokio::test]
    async fn call_rejects_missing_aspect() {
        let provider = ScriptedProvider::succeeding(
            "p",
            r#"{"overall":"mixed","confidence":0.6,"scores":{"positive":0.6,"negative":0.3,"neutral":0.1},"aspects":{"quality":"positive"},"emotions":[],"reasoning":["mixed review"]}"#,
        );
        let sentiment =
            Sentiment::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let result = sentiment
            .call(
                "Score review",
                "great service, slow delivery",
                vec!["quality".into(), "speed".into()],
                temperature::UNSET,
            )
            .await;
        assert!(matches!(result, Err(OrchestratorError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn call_accepts_full_coverage() {
        let provider = ScriptedProvider::succeeding(
            "p",
            r#"{"overall":"mixed","confidence":0.6,"scores":{"positive":0.6,"negative":0.3,"neutral":0.1},"aspects":{"quality":"positive","speed":"negative"},"emotions":["frustration"],"reasoning":["mixed review"]}"#,
        );
        let sentiment =
            Sentiment::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let resp = sentiment
            .call(
                "Score review",
                "great service, slow delivery",
                vec!["quality".into(), "speed".into()],
                temperature::UNSET,
            )
            .await
            .unwrap();
        assert_eq!(resp.aspects["quality"], "positive");
    }
}
