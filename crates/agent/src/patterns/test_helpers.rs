//! Shared test helpers for pattern tests.

use crate::session::AgentSession;
use patternlab_core::tool::ToolRegistry;
use patternlab_providers::SequentialMockProvider;
use std::sync::Arc;

/// A session over the built-in tools, driven by scripted replies.
///
/// The provider handle is returned so tests can inspect the requests sent.
pub fn scripted_session(replies: &[&str]) -> (AgentSession, Arc<SequentialMockProvider>) {
    session_with(SequentialMockProvider::texts(replies))
}

/// A session over the built-in tools using the given provider.
pub fn session_with(provider: SequentialMockProvider) -> (AgentSession, Arc<SequentialMockProvider>) {
    let provider = Arc::new(provider);
    let tools = Arc::new(patternlab_tools::default_registry());
    let session = AgentSession::new("Test-Agent", provider.clone(), "mock-model", tools);
    (session, provider)
}

/// A session with no tools registered.
pub fn toolless_session(replies: &[&str]) -> AgentSession {
    AgentSession::new(
        "Test-Agent",
        Arc::new(SequentialMockProvider::texts(replies)),
        "mock-model",
        Arc::new(ToolRegistry::new()),
    )
}
