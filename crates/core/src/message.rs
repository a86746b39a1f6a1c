//! Turn and MessageLog domain types.
//!
//! A [`Turn`] is one role-tagged message. The [`MessageLog`] is the growing
//! context window of one engine: user input, assistant replies and tool
//! observations, always sent to the provider behind a freshly built system turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (pattern prompt, tool listing)
    System,
    /// The end user, and tool observations fed back by ReAct
    User,
    /// The model
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a conversation. Immutable once appended to a log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who produced this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Optional metadata (iteration number, step index, etc.)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Turn {
    /// Create a turn with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Create a new system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Append-only ordered log of turns behind a system prompt.
///
/// The system turn is not stored: [`MessageLog::to_request`] builds it on
/// every call, so a [`reset`](MessageLog::reset) only has to drop the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLog {
    system_prompt: String,
    turns: Vec<Turn>,
}

impl MessageLog {
    /// Create an empty log with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            turns: Vec::new(),
        }
    }

    /// The system prompt placed in front of every request.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Replace the system prompt. History is untouched.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = prompt.into();
    }

    /// Append a turn built from its parts.
    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        metadata: Option<serde_json::Map<String, serde_json::Value>>,
    ) {
        let mut turn = Turn::new(role, content);
        if let Some(metadata) = metadata {
            turn.metadata = metadata;
        }
        self.turns.push(turn);
    }

    /// Append an already built turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The ordered request for the provider: system turn followed by history.
    pub fn to_request(&self) -> Vec<Turn> {
        let mut request = Vec::with_capacity(self.turns.len() + 1);
        request.push(Turn::system(&self.system_prompt));
        request.extend(self.turns.iter().cloned());
        request
    }

    /// Clear all history turns.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// History turns (the system turn is not counted).
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
