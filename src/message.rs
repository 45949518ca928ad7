//! Conversation messages and token usage.

use serde::{Deserialize, Serialize};

/// The author of a [`Message`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message supplied by the calling application or end user.
    User,
    /// A message produced by the model.
    Assistant,
    /// A system-level instruction.
    System,
}

/// A single turn in a [`Session`](crate::session::Session)'s message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// The message author.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// Optional tag naming which synapse produced this message. Not part of
    /// the canonical wire format; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Message {
    /// Construct a message with no `name` tag.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    /// Construct a `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Construct an `assistant` message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Construct a `system` message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Attach a synapse-label tag to this message.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Token usage statistics for a completion request.
///
/// `total` is treated as provider-reported and is never re-derived from
/// `prompt + completion`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub prompt: u64,
    /// Tokens consumed by the completion.
    pub completion: u64,
    /// Total tokens, as reported by the provider.
    pub total: u64,
}
