//! Error types for the patternlab domain.
//!
//! Each boundary has its own error enum. Engines turn every one of them
//! into a reported [`Outcome`](crate::outcome::Outcome) instead of raising.

use thiserror::Error;

/// Text-generation faults. Always terminal for the current `process` call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("LLM API call failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Scripted provider failure: {0}")]
    Scripted(String),
}

/// Tool faults. Never escape [`ToolRegistry::dispatch`](crate::tool::ToolRegistry::dispatch).
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("{tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),
}
