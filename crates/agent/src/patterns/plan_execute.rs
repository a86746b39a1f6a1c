//! Plan-and-Execute pattern: plan first, then run each step on its own.
//!
//! Three phases, each a fresh request rather than a continuation of the
//! message log:
//!
//! 1. **Planning**: ask for a numbered plan and parse it into a [`Plan`]
//! 2. **Execution**: one short-lived request per step; `[tool(arg)]`
//!    mentions in the step result are dispatched through the registry
//! 3. **Summary**: one request over the plan and all step results
//!
//! Steps never see each other's results. Any provider fault in any phase
//! aborts the whole call.

use async_trait::async_trait;
use patternlab_core::error::ProviderError;
use patternlab_core::message::{Role, Turn};
use patternlab_core::outcome::{Outcome, ToolCallRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AgentPattern, PatternKind};
use crate::grammar::{self, MAX_PLAN_STEPS};
use crate::session::AgentSession;

/// An ordered list of at most [`MAX_PLAN_STEPS`] step descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    steps: Vec<String>,
}

impl Plan {
    /// Build a plan, dropping steps beyond the limit.
    pub fn new(mut steps: Vec<String>) -> Self {
        steps.truncate(MAX_PLAN_STEPS);
        Self { steps }
    }

    /// Parse a planning response.
    pub fn parse(response: &str) -> Self {
        Self::new(grammar::plan_steps(response))
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `(1-based index, step)` pairs.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.steps.iter().enumerate().map(|(i, s)| (i + 1, s.as_str()))
    }

    /// `1. first\n2. second` rendering.
    pub fn render(&self) -> String {
        self.numbered()
            .map(|(i, s)| format!("{i}. {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct PlanExecuteAgent {
    session: AgentSession,
}

impl PlanExecuteAgent {
    pub fn new(mut session: AgentSession) -> Self {
        let prompt = default_system_prompt(&session);
        session.log_mut().set_system_prompt(prompt);
        Self { session }
    }

    /// Replace the default system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.session.log_mut().set_system_prompt(prompt);
        self
    }

    async fn run(&mut self, input: &str) -> Result<Outcome, ProviderError> {
        self.session.log_mut().append(Role::User, input, None);

        // ── Planning ──
        let planning = vec![
            Turn::system(self.session.log().system_prompt()),
            Turn::user(format!(
                "Create a detailed plan to accomplish this task: {input}\n\nProvide ONLY the plan as a numbered list."
            )),
        ];
        let plan = Plan::parse(&self.session.complete(planning).await?);
        info!(steps = plan.len(), "Plan created");

        // ── Execution ──
        let mut results = Vec::new();
        let mut actions = Vec::new();
        let mut calls: Vec<ToolCallRecord> = Vec::new();

        for (i, step) in plan.numbered() {
            debug!(step = i, "Executing plan step");
            let frame = vec![
                Turn::system(format!("You are executing step {i} of a plan.")),
                Turn::user(format!(
                    "Execute this step: {step}\n\nProvide the result of executing this step."
                )),
            ];
            let result = self.session.complete(frame).await?;

            results.push(format!("Step {i}: {step}\nResult: {result}"));
            actions.push(format!("Executed step {i}: {step}"));

            let mut tool_outputs = Vec::new();
            for call in grammar::bracket_calls(&result) {
                let dispatch = self.session.dispatch(call.name, call.argument).await;
                tool_outputs.push(format!("{}: {}", call.name, dispatch.output));
                calls.push(dispatch.into());
            }
            if !tool_outputs.is_empty() {
                results.push(format!("Tool Result: {}", tool_outputs.join("; ")));
            }
        }

        // ── Summary ──
        let context = format!(
            "Plan:\n{}\n\nExecution Results:\n{}",
            plan.render(),
            results.join("\n")
        );
        let summary_frame = vec![
            Turn::system("Summarize the results of the executed plan."),
            Turn::user(format!(
                "{context}\n\nProvide a concise summary of what was accomplished."
            )),
        ];
        let summary = self.session.complete(summary_frame).await?;

        let transcript = format!(
            "**PLAN:**\n{}\n\n**EXECUTION:**\n{}\n\n**FINAL RESULT:**\n{}",
            plan.render(),
            results.join("\n\n"),
            summary
        );
        self.session.log_mut().append(Role::Assistant, transcript, None);

        info!(steps = plan.len(), tool_calls = calls.len(), "Plan executed");

        let reasoning = (!plan.is_empty()).then(|| plan.render());
        Ok(Outcome::success(summary)
            .with_reasoning(reasoning)
            .with_actions(actions)
            .with_tool_calls(calls)
            .with_meta("plan", plan.steps().to_vec())
            .with_meta("execution_details", results))
    }
}

#[async_trait]
impl AgentPattern for PlanExecuteAgent {
    fn kind(&self) -> PatternKind {
        PatternKind::PlanExecute
    }

    fn session(&self) -> &AgentSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut AgentSession {
        &mut self.session
    }

    async fn process(&mut self, input: &str) -> Outcome {
        info!(agent = %self.session.name(), "Plan-and-Execute processing");
        let outcome = match self.run(input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(agent = %self.session.name(), error = %e, "Plan-and-Execute aborted");
                Outcome::failure("", e.to_string())
            }
        };
        self.session.record(&outcome);
        outcome
    }
}

fn default_system_prompt(session: &AgentSession) -> String {
    format!(
        "You are {name}, an AI assistant using the Plan and Execute pattern.

Available tools:
{tools}

When given a task, you should:
1. Create a detailed plan with numbered steps
2. Execute each step systematically
3. Report the results

Format your response like this:

**PLAN:**
1. [First step]
2. [Second step]
3. [Third step]
...

**EXECUTION:**
Step 1: [Details of executing step 1]
Result: [What happened]

Step 2: [Details of executing step 2]
Result: [What happened]

...

**FINAL RESULT:**
[Summary of what was accomplished]
",
        name = session.name(),
        tools = session.tools().describe(),
    )
}
