//! Agent patterns: three control disciplines over one text-generation
//! provider and one tool registry.
//!
//! 1. **Chain of Thought**: a single round trip with a Reasoning/Conclusion reply
//! 2. **ReAct**: a bounded Thought → Action → Observation loop
//! 3. **Plan-and-Execute**: plan once, run each step in its own frame, summarize
//!
//! Each engine owns an [`AgentSession`]; nothing mutable is shared between
//! engine instances. `process` never fails: faults are reported through
//! [`Outcome::success`](patternlab_core::Outcome) and `Outcome::error`.

pub mod chain_of_thought;
pub mod plan_execute;
pub mod react;

pub use chain_of_thought::ChainOfThoughtAgent;
pub use plan_execute::{Plan, PlanExecuteAgent};
pub use react::{ReactAgent, ReactState};

use crate::session::AgentSession;
use async_trait::async_trait;
use patternlab_config::AgentsConfig;
use patternlab_core::message::MessageLog;
use patternlab_core::outcome::Outcome;
use patternlab_core::stats::Stats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The interface every engine exposes to callers.
#[async_trait]
pub trait AgentPattern: Send {
    fn kind(&self) -> PatternKind;

    fn session(&self) -> &AgentSession;

    fn session_mut(&mut self) -> &mut AgentSession;

    /// Run one query to completion. Always returns an outcome.
    async fn process(&mut self, input: &str) -> Outcome;

    fn name(&self) -> &str {
        self.session().name()
    }

    /// Clear conversation history, keeping stats.
    fn reset(&mut self) {
        self.session_mut().reset_history();
    }

    /// Clear conversation history and stats.
    fn reset_all(&mut self) {
        self.session_mut().reset_all();
    }

    fn stats(&self) -> Stats {
        self.session().stats()
    }

    fn history(&self) -> &MessageLog {
        self.session().log()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    ChainOfThought,
    React,
    PlanExecute,
}

impl PatternKind {
    pub const ALL: [PatternKind; 3] = [
        PatternKind::ChainOfThought,
        PatternKind::React,
        PatternKind::PlanExecute,
    ];

    /// The identifier used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "chain_of_thought",
            Self::React => "react",
            Self::PlanExecute => "plan_execute",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "Chain of Thought",
            Self::React => "ReAct",
            Self::PlanExecute => "Plan and Execute",
        }
    }

    /// Default agent name used for this pattern's session.
    pub fn agent_name(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "CoT-Agent",
            Self::React => "ReAct-Agent",
            Self::PlanExecute => "PlanExecute-Agent",
        }
    }

    pub fn is_enabled(&self, config: &AgentsConfig) -> bool {
        match self {
            Self::ChainOfThought => config.chain_of_thought.enabled,
            Self::React => config.react.enabled,
            Self::PlanExecute => config.plan_execute.enabled,
        }
    }

    /// Build an engine with default settings.
    pub fn build(self, session: AgentSession) -> Box<dyn AgentPattern> {
        self.build_configured(session, &AgentsConfig::default())
    }

    /// Build an engine honoring `[agents]` settings.
    pub fn build_configured(
        self,
        session: AgentSession,
        config: &AgentsConfig,
    ) -> Box<dyn AgentPattern> {
        match self {
            Self::ChainOfThought => Box::new(ChainOfThoughtAgent::new(session)),
            Self::React => Box::new(
                ReactAgent::new(session).with_max_iterations(config.react.max_iterations),
            ),
            Self::PlanExecute => Box::new(PlanExecuteAgent::new(session)),
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pattern '{0}' (expected cot, react or plan_execute)")]
pub struct UnknownPattern(pub String);

impl FromStr for PatternKind {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cot" | "chain_of_thought" => Ok(Self::ChainOfThought),
            "react" => Ok(Self::React),
            "plan_execute" | "plan" => Ok(Self::PlanExecute),
            _ => Err(UnknownPattern(s.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;
