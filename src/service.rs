//! [`Service`]: the typed executor tying prompt, pipeline, session, and
//! hooks together.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::OrchestratorError;
use crate::hooks::{HookEvent, HookSink, NoopHookSink};
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::prompt::Prompt;
use crate::session::Session;
use crate::temperature;
use crate::validator::Validate;

/// Executes one typed orchestration call: resolves temperature, validates
/// the prompt, runs the pipeline, decodes and validates the response, and
/// commits the turn to the session -- all or nothing.
pub struct Service<S> {
    stage: S,
    session: Arc<Session>,
    hooks: Arc<dyn HookSink>,
}

impl<S: Stage> Service<S> {
    /// Construct a service over `stage` and `session`, with no hook sink
    /// attached.
    pub fn new(stage: S, session: Arc<Session>) -> Self {
        Self {
            stage,
            session,
            hooks: Arc::new(NoopHookSink),
        }
    }

    /// Attach a hook sink.
    pub fn with_hooks(mut self, hooks: Arc<dyn HookSink>) -> Self {
        self.hooks = hooks;
        self
    }

    /// The session this service executes against.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Execute one typed call.
    ///
    /// `requested_temperature` may be [`temperature::UNSET`] to defer to
    /// `default_temperature`, the synapse's own category default.
    pub async fn execute<T>(
        &self,
        synapse: &'static str,
        prompt: Prompt,
        requested_temperature: f32,
        default_temperature: f32,
    ) -> Result<T, OrchestratorError<S::Error>>
    where
        T: DeserializeOwned + Validate + serde::Serialize,
    {
        self.execute_checked(synapse, prompt, requested_temperature, default_temperature, |_| Ok(()))
            .await
    }

    /// Like [`Service::execute`], but additionally runs `extra_check`
    /// against the decoded value before committing.
    ///
    /// Some façades (e.g. [`Ranking`](crate::synapse::Ranking)) can only
    /// check full validity against information the response type's own
    /// [`Validate`] impl does not have access to (the number of candidate
    /// items offered in the prompt). `extra_check` runs in the same
    /// pre-commit window as `validate()`, so a failure here still leaves
    /// the session untouched.
    pub async fn execute_checked<T>(
        &self,
        synapse: &'static str,
        prompt: Prompt,
        requested_temperature: f32,
        default_temperature: f32,
        extra_check: impl Fn(&T) -> Result<(), String>,
    ) -> Result<T, OrchestratorError<S::Error>>
    where
        T: DeserializeOwned + Validate + serde::Serialize,
    {
        let resolved_temperature = temperature::resolve(requested_temperature, default_temperature);

        prompt
            .validate()
            .map_err(|e| OrchestratorError::InvalidInput(e.0))?;

        let request_id = Uuid::new_v4().to_string();
        let session_id = self.session.id().to_string();

        let mut messages = self.session.messages().await;
        let user_message = Message::user(prompt.render()).with_name(synapse);
        messages.push(user_message.clone());

        self.hooks.emit(HookEvent::RequestStarted {
            request_id: request_id.clone(),
            session_id: session_id.clone(),
            synapse,
            temperature: resolved_temperature,
        });
        debug!(request_id = %request_id, synapse, resolved_temperature, "execution started");

        let ctx = StageContext::new(&request_id).with_hooks(self.hooks.as_ref());

        let provider_response = match self.stage.call(&ctx, &messages, resolved_temperature).await
        {
            Ok(resp) => resp,
            Err(e) => {
                self.fail(&request_id, &session_id, synapse, &e);
                return Err(e);
            }
        };

        if provider_response.content.is_empty() {
            let err = OrchestratorError::EmptyResponse;
            self.fail(&request_id, &session_id, synapse, &err);
            return Err(err);
        }

        let decoded: T = match serde_json::from_str(&provider_response.content) {
            Ok(v) => v,
            Err(e) => {
                self.hooks.emit(HookEvent::ResponseFailed {
                    request_id: request_id.clone(),
                    reason: e.to_string(),
                });
                let err = OrchestratorError::ParseError(e.to_string());
                self.fail(&request_id, &session_id, synapse, &err);
                return Err(err);
            }
        };

        if let Err(reason) = decoded.validate().and_then(|()| extra_check(&decoded)) {
            self.hooks.emit(HookEvent::ResponseFailed {
                request_id: request_id.clone(),
                reason: reason.clone(),
            });
            let err = OrchestratorError::InvalidResponse(reason);
            self.fail(&request_id, &session_id, synapse, &err);
            return Err(err);
        }

        let assistant_message =
            Message::assistant(provider_response.content.clone()).with_name(synapse);
        self.session
            .commit_turn(user_message, assistant_message, provider_response.usage)
            .await;

        let output = serde_json::to_string(&decoded).unwrap_or_else(|_| provider_response.content.clone());
        self.hooks.emit(HookEvent::RequestCompleted {
            request_id: request_id.clone(),
            session_id,
            synapse,
            usage: provider_response.usage,
            output,
        });
        debug!(request_id = %request_id, synapse, "execution completed");

        Ok(decoded)
    }

    fn fail(
        &self,
        request_id: &str,
        session_id: &str,
        synapse: &'static str,
        err: &OrchestratorError<S::Error>,
    ) {
        warn!(request_id, synapse, error = %err, "execution failed");
        self.hooks.emit(HookEvent::RequestFailed {
            request_id: request_id.to_string(),
            session_id: session_id.to_string(),
            synapse,
            error_kind: err.kind_tag(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Terminal;
    use crate::schema::{Described, SchemaBuilder};
    use crate::testing::{Scripted, ScriptedProvider};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, serde::Serialize)]
    struct Decision {
        decision: bool,
    }

    impl Described for Decision {
        fn describe() -> serde_json::Value {
            SchemaBuilder::object()
                .required_property("decision", crate::schema::boolean())
                .build()
        }
    }

    impl Validate for Decision {
        fn validate(&self) -> Result<(), String> {
            Ok(())
        }
    }

    fn prompt() -> Prompt {
        Prompt {
            task: "Decide".into(),
            input: "some text".into(),
            schema: Decision::schema_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_execution_commits_turn_and_returns_decoded() {
        let provider = ScriptedProvider::succeeding("p", r#"{"decision":true}"#);
        let service = Service::new(Terminal::new(provider), Arc::new(Session::new()));

        let decision: Decision = service
            .execute("binary", prompt(), temperature::UNSET, 0.1)
            .await
            .unwrap();
        assert!(decision.decision);

        let msgs = service.session().messages().await;
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, crate::message::Role::User);
        assert_eq!(msgs[1].role, crate::message::Role::Assistant);
    }

    #[tokio::test]
    async fn invalid_prompt_never_reaches_provider() {
        let provider = ScriptedProvider::succeeding("p", r#"{"decision":true}"#);
        let service = Service::new(Terminal::new(provider), Arc::new(Session::new()));

        let mut bad_prompt = prompt();
        bad_prompt.task.clear();

        let result: Result<Decision, _> = service
            .execute("binary", bad_prompt, temperature::UNSET, 0.1)
            .await;
        assert!(matches!(result, Err(OrchestratorError::InvalidInput(_))));
        assert_eq!(service.session().len().await, 0);
    }

    #[tokio::test]
    async fn provider_failure_leaves_session_untouched() {
        let provider = ScriptedProvider::failing("p", "down");
        let service = Service::new(Terminal::new(provider), Arc::new(Session::new()));

        let result: Result<Decision, _> = service
            .execute("binary", prompt(), temperature::UNSET, 0.1)
            .await;
        assert!(matches!(result, Err(OrchestratorError::Provider(_))));
        assert_eq!(service.session().len().await, 0);
    }

    #[tokio::test]
    async fn empty_response_is_rejected_before_commit() {
        let provider = ScriptedProvider::succeeding("p", "");
        let service = Service::new(Terminal::new(provider), Arc::new(Session::new()));

        let result: Result<Decision, _> = service
            .execute("binary", prompt(), temperature::UNSET, 0.1)
            .await;
        assert!(matches!(result, Err(OrchestratorError::EmptyResponse)));
        assert_eq!(service.session().len().await, 0);
    }

    #[tokio::test]
    async fn unparseable_json_never_commits() {
        let provider = ScriptedProvider::succeeding("p", "not json");
        let service = Service::new(Terminal::new(provider), Arc::new(Session::new()));

        let result: Result<Decision, _> = service
            .execute("binary", prompt(), temperature::UNSET, 0.1)
            .await;
        assert!(matches!(result, Err(OrchestratorError::ParseError(_))));
        assert_eq!(service.session().len().await, 0);
    }

    #[tokio::test]
    async fn failed_validate_never_commits() {
        struct AlwaysInvalid;
        impl<'de> serde::Deserialize<'de> for AlwaysInvalid {
            fn deserialize<D>(_d: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Ok(AlwaysInvalid)
            }
        }
        impl Validate for AlwaysInvalid {
            fn validate(&self) -> Result<(), String> {
                Err("never valid".into())
            }
        }
        impl serde::Serialize for AlwaysInvalid {
            fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                s.serialize_unit()
            }
        }

        let provider = ScriptedProvider::succeeding("p", "{}");
        let service = Service::new(Terminal::new(provider), Arc::new(Session::new()));

        let result: Result<AlwaysInvalid, _> = service
            .execute("binary", prompt(), temperature::UNSET, 0.1)
            .await;
        assert!(matches!(result, Err(OrchestratorError::InvalidResponse(_))));
        assert_eq!(service.session().len().await, 0);
    }

    #[tokio::test]
    async fn temperature_resolution_uses_synapse_default_when_unset() {
        let provider = Arc::new(ScriptedProvider::new(
            "p",
            vec![Scripted::Ok(r#"{"decision":true}"#.into())],
        ));
        let service = Service::new(Terminal::new(provider.clone()), Arc::new(Session::new()));
        let _: Decision = service
            .execute("binary", prompt(), temperature::UNSET, 0.1)
            .await
            .unwrap();
        assert_eq!(provider.calls()[0].1, 0.1);
    }
}
