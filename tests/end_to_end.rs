//! End-to-end scenarios exercising the full façade -> service -> pipeline ->
//! session path with no mocking below the [`ScriptedProvider`] boundary.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use synapse_orch::operators::{Retry, RetryConfig, Timeout};
use synapse_orch::pipeline::Terminal;
use synapse_orch::schema::{boolean, number, string, Described, SchemaBuilder};
use synapse_orch::service::Service;
use synapse_orch::session::Session;
use synapse_orch::synapse::{Binary, Classification, Ranking, TopN};
use synapse_orch::temperature;
use synapse_orch::testing::{Scripted, ScriptedProvider};
use synapse_orch::validator::Validate;
use synapse_orch::OrchestratorError;

#[tokio::test]
async fn binary_decides_on_valid_input() {
    let provider = ScriptedProvider::succeeding(
        "test",
        r#"{"decision":true,"confidence":0.95,"reasoning":["mentions a valid email address"]}"#,
    );
    let session = Arc::new(Session::new());
    let binary = Binary::new(Service::new(Terminal::new(provider), session.clone()));

    let result = binary
        .call(
            "Does this message contain a valid email address?",
            "contact me at jane@example.com",
            temperature::UNSET,
        )
        .await
        .unwrap();

    assert!(result.decision);
    assert_eq!(session.len().await, 2);
}

#[tokio::test]
async fn binary_parse_failure_leaves_session_untouched() {
    let provider = ScriptedProvider::succeeding("test", "not valid json at all");
    let session = Arc::new(Session::new());
    let binary = Binary::new(Service::new(Terminal::new(provider), session.clone()));

    let result = binary
        .call("Does this look like spam?", "buy now", temperature::UNSET)
        .await;

    assert!(matches!(result, Err(OrchestratorError::ParseError(_))));
    assert_eq!(session.len().await, 0);
}

#[tokio::test]
async fn classification_chooses_among_offered_categories() {
    let provider = ScriptedProvider::succeeding(
        "test",
        r#"{"primary":"billing","secondary":"","confidence":0.7,"reasoning":["mentions a charge"]}"#,
    );
    let session = Arc::new(Session::new());
    let classification =
        Classification::new(Service::new(Terminal::new(provider), session.clone()));

    let result = classification
        .call(
            "Route this support ticket",
            "I was charged twice this month",
            vec!["billing".into(), "technical".into(), "account".into()],
            temperature::UNSET,
        )
        .await
        .unwrap();

    assert_eq!(result.primary, "billing");
}

#[tokio::test]
async fn ranking_requires_a_complete_permutation() {
    let provider = ScriptedProvider::succeeding(
        "test",
        r#"{"ranked":["candidate b","candidate a"],"confidence":0.6,"reasoning":["b is more recent"]}"#,
    );
    let session = Arc::new(Session::new());
    let ranking = Ranking::new(Service::new(Terminal::new(provider), session.clone()));

    let result = ranking
        .call(
            "Rank these candidates by relevance",
            vec!["candidate a".into(), "candidate b".into()],
            TopN::All,
            temperature::UNSET,
        )
        .await
        .unwrap();

    assert_eq!(
        result.ranked,
        vec!["candidate b".to_string(), "candidate a".to_string()]
    );
    // A successful ranking still commits exactly one turn.
    assert_eq!(session.len().await, 2);
}

#[tokio::test]
async fn ranking_rejects_an_incomplete_permutation_before_commit() {
    let provider = ScriptedProvider::succeeding(
        "test",
        r#"{"ranked":["candidate a"],"confidence":0.6,"reasoning":["only one stands out"]}"#,
    );
    let session = Arc::new(Session::new());
    let ranking = Ranking::new(Service::new(Terminal::new(provider), session.clone()));

    let result = ranking
        .call(
            "Rank these candidates by relevance",
            vec!["candidate a".into(), "candidate b".into(), "candidate c".into()],
            TopN::All,
            temperature::UNSET,
        )
        .await;

    assert!(matches!(result, Err(OrchestratorError::InvalidResponse(_))));
    assert_eq!(session.len().await, 0);
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct Decision {
    decision: bool,
}

impl Described for Decision {
    fn describe() -> Value {
        SchemaBuilder::object()
            .required_property("decision", boolean())
            .required_property("confidence", number())
            .optional_property("reasoning", string())
            .build()
    }
}

impl Validate for Decision {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[tokio::test]
async fn retry_recovers_from_a_transient_provider_failure() {
    let provider = ScriptedProvider::new(
        "test",
        vec![
            Scripted::Err("upstream 503".into()),
            Scripted::Ok(r#"{"decision":true,"confidence":0.5}"#.into()),
        ],
    );
    let stage = Retry::new(Terminal::new(provider), RetryConfig { max_attempts: 2 });
    let session = Arc::new(Session::new());
    let service = Service::new(stage, session.clone());

    let prompt = synapse_orch::Prompt {
        task: "Decide".into(),
        input: "some input".into(),
        schema: Decision::schema_string(),
        ..Default::default()
    };

    let decoded: Decision = service
        .execute("binary", prompt, temperature::UNSET, 0.1)
        .await
        .unwrap();

    assert!(decoded.decision);
    assert_eq!(session.len().await, 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_wins_against_a_provider_that_never_returns() {
    let provider = ScriptedProvider::new("test", vec![Scripted::Hang]);
    let stage = Timeout::new(Terminal::new(provider), Duration::from_millis(50));
    let session = Arc::new(Session::new());
    let service = Service::new(stage, session.clone());

    let prompt = synapse_orch::Prompt {
        task: "Decide".into(),
        input: "some input".into(),
        schema: Decision::schema_string(),
        ..Default::default()
    };

    let result: Result<Decision, _> = service
        .execute("binary", prompt, temperature::UNSET, 0.1)
        .await;

    assert!(matches!(result, Err(OrchestratorError::Cancelled)));
    assert_eq!(session.len().await, 0);
}
