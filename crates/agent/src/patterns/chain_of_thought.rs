//! Chain of Thought pattern: one round trip, step-by-step reasoning.
//!
//! The model is asked for a `**Reasoning:**` section with numbered steps and
//! a `**Conclusion:**` section. The conclusion becomes the outcome content;
//! without one the raw reply is used as-is and reasoning is absent.

use async_trait::async_trait;
use patternlab_core::message::Role;
use patternlab_core::outcome::Outcome;
use tracing::{debug, info, warn};

use super::{AgentPattern, PatternKind};
use crate::grammar;
use crate::session::AgentSession;

pub struct ChainOfThoughtAgent {
    session: AgentSession,
}

impl ChainOfThoughtAgent {
    pub fn new(mut session: AgentSession) -> Self {
        let prompt = default_system_prompt(session.name());
        session.log_mut().set_system_prompt(prompt);
        Self { session }
    }

    /// Replace the default system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.session.log_mut().set_system_prompt(prompt);
        self
    }

    async fn run(&mut self, input: &str) -> Outcome {
        self.session.log_mut().append(Role::User, input, None);

        let reply = match self.session.complete(self.session.log().to_request()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(agent = %self.session.name(), error = %e, "Chain of Thought completion failed");
                return Outcome::failure("", e.to_string());
            }
        };

        let sections = grammar::parse_cot(&reply);
        let steps = sections
            .reasoning
            .as_deref()
            .map(grammar::reasoning_steps)
            .unwrap_or_default();

        debug!(
            steps = steps.len(),
            has_conclusion = sections.conclusion.is_some(),
            "Parsed Chain of Thought reply"
        );

        self.session.log_mut().append(Role::Assistant, reply.as_str(), None);

        let content = sections.conclusion.unwrap_or(reply);
        Outcome::success(content)
            .with_reasoning(sections.reasoning)
            .with_meta("reasoning_steps", steps)
    }
}

#[async_trait]
impl AgentPattern for ChainOfThoughtAgent {
    fn kind(&self) -> PatternKind {
        PatternKind::ChainOfThought
    }

    fn session(&self) -> &AgentSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut AgentSession {
        &mut self.session
    }

    async fn process(&mut self, input: &str) -> Outcome {
        info!(agent = %self.session.name(), "Chain of Thought processing");
        let outcome = self.run(input).await;
        self.session.record(&outcome);
        outcome
    }
}

fn default_system_prompt(name: &str) -> String {
    format!(
        "You are {name}, an AI assistant using Chain of Thought reasoning.

When answering questions:
1. Break down complex problems into smaller steps
2. Show your reasoning process clearly
3. Number your reasoning steps
4. Draw conclusions based on your step-by-step analysis

Format your response like this:

**Reasoning:**
Step 1: [First reasoning step]
Step 2: [Second reasoning step]
Step 3: [Third reasoning step]
...

**Conclusion:**
[Your final answer based on the reasoning above]

Be thorough and explicit in your reasoning. Show all intermediate steps."
    )
}
