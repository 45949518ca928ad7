//! The `ranking` synapse: order a fixed set of candidate items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::pipeline::Stage;
use crate::prompt::Prompt;
use crate::schema::{array, number, string, Described, SchemaBuilder};
use crate::service::Service;
use crate::synapse::BALANCED_TEMPERATURE;
use crate::temperature;
use crate::validator::Validate;

/// The decoded result of a `ranking` call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RankingResponse {
    /// The ranked items, most relevant first, with exact item text
    /// preserved from the offered list. Non-empty.
    pub ranked: Vec<String>,
    /// Model-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Ordered steps explaining the ranking. Non-empty.
    pub reasoning: Vec<String>,
}

impl Described for RankingResponse {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("ranked", array(string()))
            .required_property("confidence", number())
            .required_property("reasoning", array(string()))
            .build()
    }
}

/// Whether [`Ranking::call`] expects a complete ordering of every offered
/// item, or a selection of just the top `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopN {
    /// Every offered item must appear in `ranked`, exactly once.
    All,
    /// Exactly `n` offered items must appear in `ranked`, each at most
    /// once, most relevant first.
    Only(usize),
}

impl RankingResponse {
    /// Check `ranked` is drawn from `items` with no duplicates, and
    /// satisfies `top_n`: a full permutation for [`TopN::All`], or exactly
    /// `n` distinct items for [`TopN::Only`].
    fn validate_against(&self, items: &[String], top_n: TopN) -> Result<(), String> {
        let expected_len = match top_n {
            TopN::All => items.len(),
            TopN::Only(n) => n,
        };
        if self.ranked.len() != expected_len {
            return Err(format!(
                "ranked has {} entries, expected {expected_len}",
                self.ranked.len()
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &self.ranked {
            if !items.iter().any(|item| item == entry) {
                return Err(format!("'{entry}' is not one of the offered items"));
            }
            if !seen.insert(entry) {
                return Err(format!("'{entry}' appears more than once in ranked"));
            }
        }
        Ok(())
    }
}

impl Validate for RankingResponse {
    fn validate(&self) -> Result<(), String> {
        if self.ranked.is_empty() {
            return Err("ranked must not be empty".into());
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
        let mut seen = std::collections::HashSet::new();
        for entry in &self.ranked {
            if !seen.insert(entry) {
                return Err(format!("'{entry}' appears more than once in ranked"));
            }
        }
        Ok(())
    }
}

/// Order `items` from most to least relevant to `task`.
pub struct Ranking<S> {
    service: Service<S>,
}

impl<S: Stage> Ranking<S> {
    /// Wrap a [`Service`] as a `ranking` façade.
    pub fn new(service: Service<S>) -> Self {
        Self { service }
    }

    /// Rank `items`, either completely ([`TopN::All`]) or down to a
    /// top-`n` selection ([`TopN::Only`]). The returned
    /// [`RankingResponse::ranked`] is additionally checked against `items`
    /// and `top_n` -- not just duplicate-free -- since the façade knows
    /// the offered set and the base [`Validate`] impl alone cannot.
    pub async fn call(
        &self,
        task: impl Into<String>,
        items: Vec<String>,
        top_n: TopN,
        temperature: f32,
    ) -> Result<RankingResponse, OrchestratorError<S::Error>> {
        let completeness_constraint = match top_n {
            TopN::All => "ranked: all items, ordered highest to lowest".to_string(),
            TopN::Only(n) => format!("ranked: select top {n} items only"),
        };
        let prompt = Prompt {
            task: task.into(),
            items: items.clone(),
            schema: RankingResponse::schema_string(),
            constraints: vec![
                completeness_constraint,
                "ranked: include every item exactly once".into(),
                "ranked: preserve exact item text".into(),
            ],
            ..Default::default()
        };
        self.service
            .execute_checked::<RankingResponse>(
                "ranking",
                prompt,
                temperature,
                BALANCED_TEMPERATURE,
                |resp| resp.validate_against(&items, top_n),
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

    fn items() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn validate_against_rejects_wrong_length() {
        let resp = RankingResponse {
            ranked: vec!["a".into(), "b".into()],
            confidence: 0.5,
            reasoning: vec!["x".into()],
        };
        assert!(resp.validate_against(&items(), TopN::All).is_err());
    }

    #[test]
    fn validate_against_rejects_unknown_item() {
        let resp = RankingResponse {
            ranked: vec!["a".into(), "b".into(), "z".into()],
            confidence: 0.5,
            reasoning: vec!["x".into()],
        };
        assert!(resp.validate_against(&items(), TopN::All).is_err());
    }

    #[test]
    fn validate_against_accepts_full_permutation() {
        let resp = RankingResponse {
            ranked: vec!["c".into(), "a".into(), "b".into()],
            confidence: 0.5,
            reasoning: vec!["x".into()],
        };
        assert!(resp.validate_against(&items(), TopN::All).is_ok());
    }

    #[test]
    fn validate_against_accepts_top_n_selection() {
        let resp = RankingResponse {
            ranked: vec!["c".into(), "a".into()],
            confidence: 0.5,
            reasoning: vec!["x".into()],
        };
        assert!(resp.validate_against(&items(), TopN::Only(2)).is_ok());
    }

    #[test]
    fn validate_against_rejects_top_n_with_wrong_count() {
        let resp = RankingResponse {
            ranked: vec!["c".into(), "a".into(), "b".into()],
            confidence: 0.5,
            reasoning: vec!["x".into()],
        };
        assert!(resp.validate_against(&items(), TopN::Only(2)).is_err());
    }

    #[tokio::test]
    async fn call_rejects_incomplete_ordering() {
        let provider =
            ScriptedProvider::succeeding("p", r#"{"ranked":["a"],"confidence":0.5,"reasoning":["x"]}"#);
        let ranking = Ranking::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let result = ranking
            .call("Rank by relevance", items(), TopN::All, temperature::UNSET)
            .await;
        assert!(matches!(result, Err(OrchestratorError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn call_accepts_full_permutation() {
        let provider = ScriptedProvider::succeeding(
            "p",
            r#"{"ranked":["b","a"],"confidence":0.7,"reasoning":["x"]}"#,
        );
        let ranking = Ranking::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let resp = ranking
            .call(
                "Rank by relevance",
                vec!["a".into(), "b".into()],
                TopN::All,
                temperature::UNSET,
            )
            .await
            .unwrap();
        assert_eq!(resp.ranked, vec!["b".to_string(), "a".to_string()]);
    }

    #[tokio::test]
    async fn call_accepts_top_n_selection() {
        let provider = ScriptedProvider::succeeding(
            "p",
            r#"{"ranked":["c","a"],"confidence":0.7,"reasoning":["x"]}"#,
        );
        let ranking = Ranking::new(Service::new(Terminal::new(provider), Arc::new(Session::new())));
        let resp = ranking
            .call("Rank by relevance", items(), TopN::Only(2), temperature::UNSET)
            .await
            .unwrap();
        assert_eq!(resp.ranked, vec!["c".to_string(), "a".to_string()]);
    }
}
