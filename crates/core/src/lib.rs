//! # patternlab Core
//!
//! Domain types, traits, and error definitions shared by the three agent
//! patterns (Chain of Thought, ReAct, Plan-and-Execute).
//! This crate has **zero framework dependencies**: it defines the domain model
//! that the provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here:
//! - [`Provider`] is the text-generation capability
//! - [`Tool`] is a named text → text capability
//!
//! Implementations live in their respective crates, so engines can be driven
//! by scripted providers in tests and by HTTP providers in production.

pub mod error;
pub mod message;
pub mod outcome;
pub mod provider;
pub mod stats;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use message::{MessageLog, Role, Turn};
pub use outcome::{Outcome, ToolCallRecord};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use stats::Stats;
pub use tool::{DispatchStatus, Tool, ToolDispatch, ToolRegistry};
