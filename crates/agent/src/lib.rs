//! Agent execution engines: the heart of patternlab.
//!
//! Three patterns drive the same provider and tool registry:
//!
//! 1. **Chain of Thought**: one request, answer parsed from a Reasoning/Conclusion reply
//! 2. **ReAct**: Thought → Action → Observation until a final answer or the iteration limit
//! 3. **Plan-and-Execute**: plan, run each step in isolation, then summarize
//!
//! Every engine implements [`AgentPattern`]. `process` always returns an
//! [`Outcome`](patternlab_core::Outcome); provider faults, unparseable
//! replies and exhausted budgets are reported through it, never raised.

pub mod grammar;
pub mod patterns;
pub mod session;

pub use patterns::{
    AgentPattern, ChainOfThoughtAgent, PatternKind, Plan, PlanExecuteAgent, ReactAgent,
    ReactState, UnknownPattern,
};
pub use session::AgentSession;
