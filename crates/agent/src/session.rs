//! Per-engine state shared by every pattern.
//!
//! An [`AgentSession`] owns the message log and stats of exactly one engine
//! instance. The provider and tool registry behind it are shared handles, so
//! several engines can be compared over the same tools.

use patternlab_config::LlmConfig;
use patternlab_core::error::ProviderError;
use patternlab_core::message::{MessageLog, Turn};
use patternlab_core::outcome::Outcome;
use patternlab_core::provider::{Provider, ProviderRequest};
use patternlab_core::stats::Stats;
use patternlab_core::tool::{ToolDispatch, ToolRegistry};
use std::sync::Arc;
use tracing::debug;

pub struct AgentSession {
    name: String,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    log: MessageLog,
    stats: Stats,
}

impl AgentSession {
    /// Create a session with default sampling parameters and an empty log.
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            log: MessageLog::new(""),
            stats: Stats::default(),
        }
    }

    /// Create a session using the model and sampling settings from `[llm]`.
    pub fn from_config(
        name: impl Into<String>,
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        llm: &LlmConfig,
    ) -> Self {
        Self::new(name, provider, llm.model.clone(), tools)
            .with_temperature(llm.temperature)
            .with_max_tokens(llm.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Send one completion request and return the generated text.
    pub async fn complete(&self, turns: Vec<Turn>) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: turns,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            agent = %self.name,
            provider = %self.provider.name(),
            turns = request.messages.len(),
            "Requesting completion"
        );

        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }

    /// Run a tool through the shared registry.
    pub async fn dispatch(&self, name: &str, input: &str) -> ToolDispatch {
        self.tools.dispatch(name, input).await
    }

    /// Count one finished `process` call.
    pub fn record(&mut self, outcome: &Outcome) {
        self.stats.record(outcome.success, outcome.tool_calls.len());
    }

    /// Clear the conversation history. Stats are kept.
    pub fn reset_history(&mut self) {
        self.log.reset();
    }

    /// Clear history and stats.
    pub fn reset_all(&mut self) {
        self.log.reset();
        self.stats = Stats::default();
    }
}
