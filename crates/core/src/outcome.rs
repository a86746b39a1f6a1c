//! Outcome: the structured result of one `process` call.
//!
//! Every engine returns exactly one Outcome per call. `success` and `error`
//! are the only failure signal; nothing is raised to the caller.

use serde::{Deserialize, Serialize};
use crate::tool::{DispatchStatus, ToolDispatch};

/// One tool invocation made while producing an outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub input: String,
    pub output: String,
    pub status: DispatchStatus,
}

impl From<ToolDispatch> for ToolCallRecord {
    fn from(d: ToolDispatch) -> Self {
        Self {
            tool: d.tool,
            input: d.input,
            output: d.output,
            status: d.status,
        }
    }
}

/// The result of running one query through an agent pattern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outcome {
    /// The answer shown to the user.
    pub content: String,

    /// The reasoning trace, if the pattern produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Raw action strings, in order.
    #[serde(default)]
    pub actions_taken: Vec<String>,

    /// Structured tool invocations, in order.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Outcome {
    /// A successful outcome with the given content.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
            ..Default::default()
        }
    }

    /// A failed outcome with the given content and error description.
    pub fn failure(content: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_reasoning(mut self, reasoning: Option<String>) -> Self {
        self.reasoning = reasoning;
        self
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        self.actions_taken = actions;
        self
    }

    pub fn with_tool_calls(mut self, calls: Vec<ToolCallRecord>) -> Self {
        self.tool_calls = calls;
        self
    }

    /// Insert one metadata entry.
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}
