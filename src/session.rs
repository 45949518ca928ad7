//! [`Session`]: a concurrency-safe, ordered conversation log.
//!
//! Reads and writes go through a [`tokio::sync::RwLock`], giving the
//! multi-reader/single-writer semantics the orchestration layer needs:
//! concurrent [`Service`](crate::service::Service) executions may snapshot
//! the message log at the same time, but a commit excludes every other
//! reader and writer for the duration of its critical section.

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::message::{Message, Usage};

struct SessionState {
    messages: Vec<Message>,
    last_usage: Option<Usage>,
}

/// An ordered, append-biased conversation log with no persistence of its
/// own -- the caller owns whatever storage (if any) outlives the process.
pub struct Session {
    id: String,
    state: RwLock<SessionState>,
}

impl Session {
    /// Create an empty session with a freshly generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create an empty session with a caller-supplied id, e.g. one restored
    /// from the caller's own storage.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: RwLock::new(SessionState {
                messages: Vec::new(),
                last_usage: None,
            }),
        }
    }

    /// The session's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A defensive copy of the current message log, in order.
    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    /// Replace the entire message log with a copy of `messages`.
    pub async fn set_messages(&self, messages: Vec<Message>) {
        self.state.write().await.messages = messages;
    }

    /// Append a single message to the end of the log.
    pub async fn append(&self, message: Message) {
        self.state.write().await.messages.push(message);
    }

    /// Remove every message, preserving `id` and `last_usage`.
    pub async fn clear(&self) {
        self.state.write().await.messages.clear();
    }

    /// Remove the oldest `n` messages. `n` larger than the current length
    /// clears the log.
    pub async fn prune(&self, n: usize) {
        let mut guard = self.state.write().await;
        let drain_to = n.min(guard.messages.len());
        guard.messages.drain(0..drain_to);
    }

    /// Keep only the first `n` messages, discarding the rest. `n` larger
    /// than the current length is a no-op.
    pub async fn truncate(&self, n: usize) {
        self.state.write().await.messages.truncate(n);
    }

    /// Remove and return the message at `index`, or `None` if out of range.
    pub async fn remove(&self, index: usize) -> Option<Message> {
        let mut guard = self.state.write().await;
        if index < guard.messages.len() {
            Some(guard.messages.remove(index))
        } else {
            None
        }
    }

    /// Replace the message at `index`. Fails if `index` is out of range.
    pub async fn replace(&self, index: usize, message: Message) -> Result<(), String> {
        let mut guard = self.state.write().await;
        match guard.messages.get_mut(index) {
            Some(slot) => {
                *slot = message;
                Ok(())
            }
            None => Err(format!(
                "index {index} out of range (len {})",
                guard.messages.len()
            )),
        }
    }

    /// Insert `message` at `index`, shifting later messages back. Fails if
    /// `index` is greater than the current length.
    pub async fn insert(&self, index: usize, message: Message) -> Result<(), String> {
        let mut guard = self.state.write().await;
        if index > guard.messages.len() {
            return Err(format!(
                "index {index} out of range (len {})",
                guard.messages.len()
            ));
        }
        guard.messages.insert(index, message);
        Ok(())
    }

    /// Overwrite the last reported [`Usage`].
    pub async fn set_usage(&self, usage: Usage) {
        self.state.write().await.last_usage = Some(usage);
    }

    /// The current number of messages.
    pub async fn len(&self) -> usize {
        self.state.read().await.messages.len()
    }

    /// `true` if the session has no messages.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.messages.is_empty()
    }

    /// The most recently recorded [`Usage`], if any.
    pub async fn last_usage(&self) -> Option<Usage> {
        self.state.read().await.last_usage
    }

    /// Atomically append a user/assistant turn and record its usage.
    ///
    /// Holds a single write lock for the whole operation so no reader ever
    /// observes a user message without its paired assistant reply, and the
    /// usage update is never split from the append it accompanies.
    pub async fn commit_turn(&self, user: Message, assistant: Message, usage: Usage) {
        let mut guard = self.state.write().await;
        guard.messages.push(user);
        guard.messages.push(assistant);
        guard.last_usage = Some(usage);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
