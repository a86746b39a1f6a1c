//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are named text → text functions (calculator, search, weather).
//! The [`ToolRegistry`] is the only place engines touch them: lookup is
//! case-insensitive, and every fault is turned into observation text at
//! [`ToolRegistry::dispatch`] so nothing a tool does can abort an engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};
use crate::error::ToolError;

/// The core Tool trait.
///
/// Each tool receives the raw argument text the model wrote and returns
/// plain text for the model to read. Tools must be safe to invoke repeatedly.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculator", "search").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// Execute the tool with the given input.
    async fn execute(&self, input: &str) -> std::result::Result<String, ToolError>;
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// The tool ran and returned output.
    Completed,
    /// No tool is registered under that name.
    NotFound,
    /// The tool ran and reported a fault.
    Failed,
}

/// The textual result of one dispatch. Always produced, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDispatch {
    /// The name as requested by the model.
    pub tool: String,
    /// The input passed to the tool.
    pub input: String,
    /// Tool output, or the not-found / failure message.
    pub output: String,
    pub status: DispatchStatus,
}

impl ToolDispatch {
    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Completed
    }
}

struct RegisteredTool {
    tool: Box<dyn Tool>,
    calls: AtomicU64,
}

/// A registry of available tools, keyed by lowercase name.
///
/// Shared across engines through an `Arc`; call counters are atomic.
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name (ignoring case).
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let key = tool.name().to_lowercase();
        let entry = RegisteredTool {
            tool,
            calls: AtomicU64::new(0),
        };
        if self.tools.insert(key.clone(), entry).is_some() {
            warn!(tool = %key, "Replaced previously registered tool");
        }
    }

    /// Get a tool by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .get(&name.to_lowercase())
            .map(|entry| entry.tool.as_ref())
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.values().map(|e| e.tool.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One "- name: description" line per tool, for system prompts.
    pub fn describe(&self) -> String {
        if self.tools.is_empty() {
            return "No tools available".into();
        }
        let mut entries: Vec<&RegisteredTool> = self.tools.values().collect();
        entries.sort_unstable_by(|a, b| a.tool.name().cmp(b.tool.name()));
        entries
            .iter()
            .map(|e| format!("- {}: {}", e.tool.name(), e.tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// How many times the named tool has been invoked through this registry.
    pub fn call_count(&self, name: &str) -> u64 {
        self.tools
            .get(&name.to_lowercase())
            .map(|e| e.calls.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Look up and run a tool, converting misses and tool errors into text.
    ///
    /// An unknown name yields a not-found message listing the registered
    /// tools; a tool error yields "Tool execution failed: ...". Neither is
    /// returned as an error.
    pub async fn dispatch(&self, name: &str, input: &str) -> ToolDispatch {
        let name = name.trim();
        let input = input.trim();

        let Some(entry) = self.tools.get(&name.to_lowercase()) else {
            debug!(tool = %name, "Tool not found");
            return ToolDispatch {
                tool: name.to_string(),
                input: input.to_string(),
                output: format!(
                    "Tool '{}' not found. Available tools: [{}]",
                    name,
                    self.names().join(", ")
                ),
                status: DispatchStatus::NotFound,
            };
        };

        entry.calls.fetch_add(1, Ordering::Relaxed);

        // Only `ToolError` becomes observation text. A panicking tool unwinds
        // through here to the caller.
        match entry.tool.execute(input).await {
            Ok(output) => {
                debug!(tool = %entry.tool.name(), "Tool executed");
                ToolDispatch {
                    tool: name.to_string(),
                    input: input.to_string(),
                    output,
                    status: DispatchStatus::Completed,
                }
            }
            Err(e) => {
                warn!(tool = %entry.tool.name(), error = %e, "Tool execution failed");
                ToolDispatch {
                    tool: name.to_string(),
                    input: input.to_string(),
                    output: format!("Tool execution failed: {e}"),
                    status: DispatchStatus::Failed,
                }
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
