//! ReAct pattern: Thought → Action → Observation loop.
//!
//! The model reasons step-by-step, choosing tools to gather information,
//! then gives a final answer. Each iteration is exactly one completion
//! followed by at most one tool dispatch; nothing runs concurrently.
//!
//! # Trace Format
//!
//! Each iteration records:
//! - **Thought**: the model's reasoning
//! - **Action**: `tool_name: input`, or `Final Answer: ...` to stop
//! - **Observation**: the tool result, fed back as the next user turn
//!
//! The loop ends on a final answer, on a reply that has no Thought/Action
//! pair, on a provider fault, or when `max_iterations` is used up.

use async_trait::async_trait;
use patternlab_core::message::{Role, Turn};
use patternlab_core::outcome::{Outcome, ToolCallRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use super::{AgentPattern, PatternKind};
use crate::grammar;
use crate::session::AgentSession;

const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Where the loop is. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactState {
    Thinking,
    Acting,
    Observing,
    Done,
    Failed,
}

impl fmt::Display for ReactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Thinking => "thinking",
            Self::Acting => "acting",
            Self::Observing => "observing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub struct ReactAgent {
    session: AgentSession,
    max_iterations: u32,
}

/// Everything accumulated during one `process` call.
struct Trace {
    state: ReactState,
    iterations: u32,
    reasoning: Vec<String>,
    actions: Vec<String>,
    calls: Vec<ToolCallRecord>,
}

impl Trace {
    fn new() -> Self {
        Self {
            state: ReactState::Thinking,
            iterations: 0,
            reasoning: Vec::new(),
            actions: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Attach the trace to a terminal outcome.
    fn finish(self, outcome: Outcome) -> Outcome {
        let reasoning = (!self.reasoning.is_empty()).then(|| self.reasoning.join("\n"));
        outcome
            .with_reasoning(reasoning)
            .with_actions(self.actions)
            .with_tool_calls(self.calls)
            .with_meta("iterations", self.iterations)
            .with_meta("state", self.state.to_string())
    }
}

impl ReactAgent {
    pub fn new(mut session: AgentSession) -> Self {
        let prompt = default_system_prompt(&session);
        session.log_mut().set_system_prompt(prompt);
        Self {
            session,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set max iterations. Zero is raised to one.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Replace the default system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.session.log_mut().set_system_prompt(prompt);
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    async fn run(&mut self, input: &str) -> Outcome {
        self.session.log_mut().append(Role::User, input, None);
        let mut trace = Trace::new();

        while trace.iterations < self.max_iterations {
            trace.iterations += 1;
            trace.state = ReactState::Thinking;
            debug!(iteration = trace.iterations, "ReAct iteration");

            let reply = match self.session.complete(self.session.log().to_request()).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(iteration = trace.iterations, error = %e, "ReAct completion failed");
                    trace.state = ReactState::Failed;
                    return trace.finish(Outcome::failure("", e.to_string()));
                }
            };

            let step = match grammar::parse_react(&reply) {
                Ok(step) => step,
                Err(e) => {
                    warn!(iteration = trace.iterations, error = %e, "ReAct reply did not parse");
                    trace
                        .reasoning
                        .push(format!("Iteration {}: Failed to parse response", trace.iterations));
                    trace.state = ReactState::Failed;
                    return trace.finish(
                        Outcome::failure(
                            "Could not parse a Thought and Action from the model response.",
                            format!("failed to parse ReAct response: {e}"),
                        )
                        .with_meta("raw_response", reply),
                    );
                }
            };

            trace.reasoning.push(format!("Thought: {}", step.thought));

            if let Some(answer) = grammar::final_answer(&step.action) {
                info!(
                    iterations = trace.iterations,
                    tool_calls = trace.calls.len(),
                    "ReAct loop completed"
                );
                self.session.log_mut().append(Role::Assistant, answer, None);
                trace.state = ReactState::Done;
                return trace.finish(Outcome::success(answer));
            }

            trace.state = ReactState::Acting;
            let observation = match grammar::split_tool_action(&step.action) {
                Some((name, tool_input)) => {
                    debug!(tool = %name, "ReAct action");
                    let dispatch = self.session.dispatch(name, tool_input).await;
                    let output = dispatch.output.clone();
                    trace.calls.push(dispatch.into());
                    output
                }
                None => grammar::invalid_action_observation(&step.action),
            };
            trace.actions.push(format!("Action: {}", step.action));

            trace.state = ReactState::Observing;
            trace.reasoning.push(format!("Observation: {observation}"));

            let mut tag = serde_json::Map::new();
            tag.insert("iteration".into(), trace.iterations.into());
            let log = self.session.log_mut();
            log.push(
                Turn::assistant(format!("Thought: {}\nAction: {}", step.thought, step.action))
                    .with_metadata(tag.clone()),
            );
            log.push(Turn::user(format!("Observation: {observation}")).with_metadata(tag));
        }

        warn!(max = self.max_iterations, "ReAct: max iterations reached");
        trace.state = ReactState::Failed;
        trace.finish(Outcome::failure(
            "Maximum iterations reached without finding a final answer.",
            "max iterations exceeded",
        ))
    }
}

#[async_trait]
impl AgentPattern for ReactAgent {
    fn kind(&self) -> PatternKind {
        PatternKind::React
    }

    fn session(&self) -> &AgentSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut AgentSession {
        &mut self.session
    }

    async fn process(&mut self, input: &str) -> Outcome {
        info!(agent = %self.session.name(), max_iter = self.max_iterations, "ReAct loop starting");
        let outcome = self.run(input).await;
        self.session.record(&outcome);
        outcome
    }
}

fn default_system_prompt(session: &AgentSession) -> String {
    format!(
        "You are {name}, an AI assistant using the ReAct (Reasoning and Acting) pattern.

For each step, you should:
1. **Thought**: Think about what you need to do next
2. **Action**: Choose an action to take (or Final Answer if done)
3. **Observation**: You'll receive the result of your action

Available tools:
{tools}

Format your response EXACTLY like this:
Thought: [your reasoning here]
Action: [tool_name: tool_input] OR [Final Answer: your final response]

Example:
Thought: I need to search for information about X
Action: search: what is X
... (you'll get observation)
Thought: Based on the search results, I now know Y
Action: Final Answer: The answer is Y

Remember: Always include both Thought and Action in your response.",
        name = session.name(),
        tools = session.tools().describe(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::*;
    use patternlab_core::tool::DispatchStatus;
    use patternlab_providers::SequentialMockProvider;
    use patternlab_core::error::ProviderError;

    #[tokio::test]
    async fn two_turn_calculation() {
        let (session, provider) = scripted_session(&[
            "Thought: need math\nAction: calculator: 25*4+10",
            "Thought: done\nAction: Final Answer: 110",
        ]);
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("What is 25 * 4 + 10?").await;

        assert!(outcome.success);
        assert_eq!(outcome.content, "110");
        assert_eq!(outcome.actions_taken, vec!["Action: calculator: 25*4+10"]);
        assert_eq!(outcome.tool_calls.len(), 1);
        assert_eq!(outcome.tool_calls[0].output, "25*4+10 = 110");
        assert_eq!(outcome.metadata["iterations"], 2);
        assert_eq!(outcome.metadata["state"], "done");
        assert_eq!(
            outcome.reasoning.as_deref(),
            Some("Thought: need math\nObservation: 25*4+10 = 110\nThought: done")
        );
        assert_eq!(provider.call_count(), 2);
        assert_eq!(agent.stats().total_tool_calls, 1);
    }

    #[tokio::test]
    async fn observation_feeds_next_request() {
        let (session, provider) = scripted_session(&[
            "Thought: look up weather\nAction: weather: Paris",
            "Thought: ok\nAction: Final Answer: mild",
        ]);
        let mut agent = ReactAgent::new(session);
        agent.process("Weather in Paris?").await;

        let second = &provider.requests()[1].messages;
        // system, user, assistant (thought+action), user (observation)
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].role, Role::Assistant);
        assert_eq!(second[2].content, "Thought: look up weather\nAction: weather: Paris");
        assert!(second[3].content.starts_with("Observation: Weather in Paris:"));
        assert_eq!(second[2].metadata["iteration"], 1);
        assert_eq!(second[3].metadata["iteration"], 1);
        assert!(second[1].metadata.is_empty());

        // The closing assistant turn is the stripped answer.
        assert_eq!(agent.history().last().unwrap().content, "mild");
        assert_eq!(agent.history().len(), 4);
    }

    #[tokio::test]
    async fn tool_lookup_is_case_insensitive() {
        let (session, _) = scripted_session(&[
            "Thought: t\nAction: CALCULATOR: 2 + 2",
            "Thought: t\nAction: Final Answer: 4",
        ]);
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("2+2").await;

        assert_eq!(outcome.tool_calls[0].status, DispatchStatus::Completed);
        assert_eq!(outcome.tool_calls[0].output, "2 + 2 = 4");
    }

    #[tokio::test]
    async fn unknown_tool_becomes_observation() {
        let (session, provider) = scripted_session(&[
            "Thought: beam me up\nAction: teleport: x",
            "Thought: no such tool\nAction: Final Answer: cannot",
        ]);
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("go").await;

        assert!(outcome.success);
        assert_eq!(outcome.tool_calls[0].status, DispatchStatus::NotFound);
        let observation = &provider.requests()[1].messages[3].content;
        assert!(observation.contains("not found"));
        assert!(observation.contains("calculator, search, weather"));
    }

    #[tokio::test]
    async fn tool_failure_becomes_observation() {
        let (session, provider) = scripted_session(&[
            "Thought: divide\nAction: calculator: 1/0",
            "Thought: oops\nAction: Final Answer: undefined",
        ]);
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("1/0").await;

        assert!(outcome.success);
        assert_eq!(outcome.tool_calls[0].status, DispatchStatus::Failed);
        let observation = &provider.requests()[1].messages[3].content;
        assert!(observation.starts_with("Observation: Tool execution failed:"));
    }

    #[tokio::test]
    async fn action_without_colon_skips_registry() {
        let (session, provider) = scripted_session(&[
            "Thought: hmm\nAction: do something",
            "Thought: fine\nAction: Final Answer: ok",
        ]);
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("q").await;

        assert!(outcome.success);
        assert!(outcome.tool_calls.is_empty());
        assert_eq!(outcome.actions_taken, vec!["Action: do something"]);
        assert_eq!(
            provider.requests()[1].messages[3].content,
            "Observation: Invalid action format. Expected 'tool_name: input', got 'do something'"
        );
    }

    #[tokio::test]
    async fn unparseable_reply_fails_immediately() {
        let (session, provider) = scripted_session(&[
            "**Reasoning:** I'll just answer. **Conclusion:** 42",
            "Thought: never reached\nAction: Final Answer: x",
        ]);
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("q").await;

        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("Thought"));
        assert_eq!(outcome.reasoning.as_deref(), Some("Iteration 1: Failed to parse response"));
        assert_eq!(outcome.metadata["state"], "failed");
        assert!(outcome.metadata["raw_response"].as_str().unwrap().contains("42"));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(agent.stats().failed_queries, 1);
    }

    #[tokio::test]
    async fn max_iterations_exceeded() {
        let looping = "Thought: keep searching\nAction: search: rust";
        let (session, provider) = scripted_session(&[looping, looping, looping, looping]);
        let mut agent = ReactAgent::new(session).with_max_iterations(3);

        let outcome = agent.process("loop forever").await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("max iterations exceeded"));
        assert_eq!(
            outcome.content,
            "Maximum iterations reached without finding a final answer."
        );
        assert_eq!(outcome.actions_taken.len(), 3);
        assert_eq!(outcome.metadata["iterations"], 3);
        assert_eq!(provider.call_count(), 3);
        // Tool calls made before giving up still count.
        assert_eq!(agent.stats().total_tool_calls, 3);
        assert_eq!(agent.stats().failed_queries, 1);
    }

    #[tokio::test]
    async fn iterations_never_exceed_budget() {
        for max in 1..=4u32 {
            let looping = "Thought: again\nAction: weather: Oslo";
            let replies = vec![looping; 8];
            let (session, provider) = scripted_session(&replies);
            let mut agent = ReactAgent::new(session).with_max_iterations(max);

            agent.process("q").await;

            assert_eq!(provider.call_count(), max as usize);
        }
    }

    #[tokio::test]
    async fn provider_fault_is_terminal() {
        let (session, _) = session_with(SequentialMockProvider::new(vec![
            Ok("Thought: t\nAction: search: ai".into()),
            Err(ProviderError::RateLimited { retry_after_secs: 5 }),
        ]));
        let mut agent = ReactAgent::new(session);

        let outcome = agent.process("q").await;

        assert!(!outcome.success);
        assert!(outcome.content.is_empty());
        assert!(outcome.error.is_some());
        assert_eq!(outcome.actions_taken.len(), 1);
        assert_eq!(outcome.metadata["state"], "failed");
    }

    #[test]
    fn zero_iterations_raised_to_one() {
        let agent = ReactAgent::new(toolless_session(&[])).with_max_iterations(0);
        assert_eq!(agent.max_iterations(), 1);
    }

    #[test]
    fn prompt_lists_tools() {
        let (session, _) = scripted_session(&[]);
        let agent = ReactAgent::new(session);
        let prompt = agent.history().system_prompt();
        assert!(prompt.contains("- calculator: "));
        assert!(prompt.contains("Final Answer"));

        let bare = ReactAgent::new(toolless_session(&[]));
        assert!(bare.history().system_prompt().contains("No tools available"));
    }

    #[tokio::test]
    async fn reset_clears_history_but_not_stats() {
        let (session, _) = scripted_session(&["Thought: t\nAction: Final Answer: hi"]);
        let mut agent = ReactAgent::new(session);

        agent.process("hello").await;
        assert_eq!(agent.history().len(), 2);

        agent.reset();
        assert_eq!(agent.history().len(), 0);
        assert_eq!(agent.stats().total_queries, 1);
        assert_eq!(agent.stats().successful_queries, 1);
    }
}
