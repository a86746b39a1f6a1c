//! End-to-end integration tests for the patternlab agent patterns.
//!
//! These tests wire real tools, sessions and engines together and drive
//! them with scripted providers, from user input to outcome and stats.

use std::sync::Arc;

use patternlab_agent::{
    AgentPattern, AgentSession, ChainOfThoughtAgent, PatternKind, PlanExecuteAgent, ReactAgent,
};
use patternlab_bench::{BenchRunner, TestCorpus};
use patternlab_config::AppConfig;
use patternlab_core::error::ProviderError;
use patternlab_core::message::Role;
use patternlab_core::provider::{Provider, ProviderRequest, ProviderResponse};
use patternlab_core::tool::DispatchStatus;
use patternlab_providers::SequentialMockProvider;
use patternlab_tools::{default_registry, registry_from_config};

// ── Helpers ──────────────────────────────────────────────────────────────

fn session_for(provider: Arc<dyn Provider>, name: &str) -> AgentSession {
    AgentSession::new(name, provider, "e2e-model", Arc::new(default_registry()))
}

fn scripted(replies: &[&str]) -> Arc<SequentialMockProvider> {
    Arc::new(SequentialMockProvider::texts(replies))
}

/// A provider that echoes the last user turn back inside a CoT frame.
struct EchoProvider;

#[async_trait::async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "e2e_echo"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let last = request
            .messages
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.clone())
            .ok_or(ProviderError::EmptyResponse)?;
        Ok(ProviderResponse::text(
            format!("**Reasoning:**\nStep 1: read the question\n\n**Conclusion:**\nYou asked: {last}"),
            request.model,
        ))
    }
}

// ── Chain of Thought ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_cot_single_call() {
    let provider = scripted(&["**Reasoning:**\nStep 1: 25 * 4 = 100\nStep 2: 100 + 10 = 110\n\n**Conclusion:**\n110"]);
    let mut agent = ChainOfThoughtAgent::new(session_for(provider.clone(), "CoT-Agent"));

    let outcome = agent.process("What is 25 * 4 + 10?").await;

    assert!(outcome.success);
    assert_eq!(outcome.content, "110");
    assert_eq!(
        outcome.metadata["reasoning_steps"],
        serde_json::json!(["25 * 4 = 100", "100 + 10 = 110"])
    );
    assert!(outcome.tool_calls.is_empty());
    assert_eq!(provider.call_count(), 1);
    assert_eq!(agent.stats().successful_queries, 1);
}

#[tokio::test]
async fn e2e_cot_history_carries_across_queries() {
    let mut agent = ChainOfThoughtAgent::new(session_for(Arc::new(EchoProvider), "CoT-Agent"));

    let first = agent.process("first question").await;
    let second = agent.process("second question").await;

    assert_eq!(first.content, "You asked: first question");
    assert_eq!(second.content, "You asked: second question");
    // user + assistant per query
    assert_eq!(agent.history().len(), 4);
    assert_eq!(agent.stats().total_queries, 2);
}

#[tokio::test]
async fn e2e_cot_provider_fault() {
    let provider = Arc::new(SequentialMockProvider::failing("offline"));
    let mut agent = ChainOfThoughtAgent::new(session_for(provider, "CoT-Agent"));

    let outcome = agent.process("anything").await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("offline"));
    assert_eq!(agent.stats().failed_queries, 1);
}

// ── ReAct ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_react_calculator_then_answer() {
    let provider = scripted(&[
        "Thought: I should compute this.\nAction: calculator: 25 * 4 + 10",
        "Thought: The tool says 110.\nAction: Final Answer: The answer is 110",
    ]);
    let mut agent = ReactAgent::new(session_for(provider.clone(), "ReAct-Agent"));

    let outcome = agent.process("What is 25 * 4 + 10?").await;

    assert!(outcome.success);
    assert_eq!(outcome.content, "The answer is 110");
    assert_eq!(outcome.tool_calls.len(), 1);
    assert_eq!(outcome.tool_calls[0].tool, "calculator");
    assert_eq!(outcome.tool_calls[0].output, "25 * 4 + 10 = 110");
    assert_eq!(outcome.metadata["iterations"], 2);

    // The second request carries the observation.
    let second = &provider.requests()[1].messages;
    assert_eq!(
        second.last().unwrap().content,
        "Observation: 25 * 4 + 10 = 110"
    );

    let stats = agent.stats();
    assert_eq!(stats.total_queries, 1);
    assert_eq!(stats.total_tool_calls, 1);
}

#[tokio::test]
async fn e2e_react_multi_tool_chain() {
    let provider = scripted(&[
        "Thought: Check the weather first.\nAction: weather: Beijing",
        "Thought: Convert to Fahrenheit.\nAction: calculator: 25 * 9 / 5 + 32",
        "Thought: Done.\nAction: Final Answer: 77 degrees Fahrenheit",
    ]);
    let mut agent = ReactAgent::new(session_for(provider, "ReAct-Agent"));

    let outcome = agent
        .process("What's the weather in Beijing, in Fahrenheit?")
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.tool_calls.len(), 2);
    assert!(outcome.tool_calls[0].output.starts_with("Weather in Beijing:"));
    assert_eq!(outcome.tool_calls[1].output, "25 * 9 / 5 + 32 = 77");
    assert_eq!(
        outcome.actions_taken,
        vec![
            "Action: weather: Beijing",
            "Action: calculator: 25 * 9 / 5 + 32",
        ]
    );
}

#[tokio::test]
async fn e2e_react_disabled_tool_is_observed_not_fatal() {
    let mut config = AppConfig::default();
    config.tools.weather.enabled = false;
    let tools = Arc::new(registry_from_config(&config.tools));

    let provider = scripted(&[
        "Thought: weather\nAction: weather: Oslo",
        "Thought: no weather tool\nAction: Final Answer: unknown",
    ]);
    let session = AgentSession::new("ReAct-Agent", provider, "e2e-model", tools);
    let mut agent = ReactAgent::new(session);

    let outcome = agent.process("Weather in Oslo?").await;

    assert!(outcome.success);
    assert_eq!(outcome.tool_calls[0].status, DispatchStatus::NotFound);
}

#[tokio::test]
async fn e2e_react_runs_out_of_iterations() {
    let provider = scripted(&[
        "Thought: again\nAction: search: rust",
        "Thought: again\nAction: search: rust",
        "Thought: again\nAction: search: rust",
    ]);
    let mut agent = ReactAgent::new(session_for(provider.clone(), "ReAct-Agent"))
        .with_max_iterations(2);

    let outcome = agent.process("loop forever").await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("max iterations exceeded"));
    assert_eq!(provider.call_count(), 2);
    assert_eq!(provider.remaining(), 1);
    assert_eq!(agent.stats().total_tool_calls, 2);
}

#[tokio::test]
async fn e2e_reset_keeps_stats() {
    let provider = scripted(&[
        "Thought: t\nAction: Final Answer: one",
        "Thought: t\nAction: Final Answer: two",
    ]);
    let mut agent = ReactAgent::new(session_for(provider, "ReAct-Agent"));

    agent.process("first").await;
    agent.reset();
    assert!(agent.history().is_empty());

    agent.process("second").await;
    assert_eq!(agent.stats().total_queries, 2);

    agent.reset_all();
    assert_eq!(agent.stats().total_queries, 0);
}

// ── Plan and Execute ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_plan_execute_with_tools() {
    let provider = scripted(&[
        "1. Compute the distance\n2. Look up background on trains",
        "Distance: [calculator(80 * 2.5)]",
        "Background: [search(react)]",
        "The train travels 200 km.",
    ]);
    let mut agent = PlanExecuteAgent::new(session_for(provider.clone(), "PlanExecute-Agent"));

    let outcome = agent
        .process("If a train travels at 80 km/h for 2.5 hours, how far does it go?")
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.content, "The train travels 200 km.");
    assert_eq!(outcome.actions_taken.len(), 2);
    assert_eq!(outcome.tool_calls.len(), 2);
    assert_eq!(outcome.tool_calls[0].output, "80 * 2.5 = 200");
    assert!(outcome.tool_calls[1].output.starts_with("Search results for 'react':"));
    assert_eq!(provider.call_count(), 4);
    assert_eq!(agent.stats().total_tool_calls, 2);
}

#[tokio::test]
async fn e2e_plan_is_capped_at_ten_steps() {
    let plan: String = (1..=12).map(|i| format!("{i}. step {i}\n")).collect();
    let mut replies: Vec<String> = vec![plan];
    replies.extend((1..=10).map(|i| format!("did {i}")));
    replies.push("all done".into());

    let provider = Arc::new(SequentialMockProvider::texts(&replies[..]));
    let mut agent = PlanExecuteAgent::new(session_for(provider.clone(), "PlanExecute-Agent"));

    let outcome = agent.process("a long task").await;

    assert!(outcome.success);
    assert_eq!(outcome.actions_taken.len(), 10);
    assert_eq!(outcome.metadata["plan"].as_array().unwrap().len(), 10);
    // plan + 10 steps + summary
    assert_eq!(provider.call_count(), 12);
    assert_eq!(provider.remaining(), 0);
}

#[tokio::test]
async fn e2e_plan_execute_step_fault_stops_run() {
    let provider = Arc::new(SequentialMockProvider::new(vec![
        Ok("1. A\n2. B".into()),
        Err(ProviderError::Network("connection reset".into())),
    ]));
    let mut agent = PlanExecuteAgent::new(session_for(provider.clone(), "PlanExecute-Agent"));

    let outcome = agent.process("task").await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("connection reset"));
    assert_eq!(provider.call_count(), 2);
    assert_eq!(agent.stats().failed_queries, 1);
}

// ── Config-driven wiring ─────────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_file_drives_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[llm]
provider = "mock"
model = "mock-model"

[agents.react]
max_iterations = 3

[agents.plan_execute]
enabled = false
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    let provider = patternlab_providers::build_from_config(&config, false).unwrap();
    let tools = Arc::new(registry_from_config(&config.tools));

    let mut agents: Vec<Box<dyn AgentPattern>> = PatternKind::ALL
        .into_iter()
        .filter(|k| k.is_enabled(&config.agents))
        .map(|kind| {
            let session =
                AgentSession::from_config(kind.agent_name(), provider.clone(), tools.clone(), &config.llm);
            kind.build_configured(session, &config.agents)
        })
        .collect();

    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].name(), "CoT-Agent");
    assert_eq!(agents[1].name(), "ReAct-Agent");

    // The canned mock reply is a CoT answer.
    let cot = agents[0].process("What is 2 + 2?").await;
    assert!(cot.success);

    let react = agents[1].process("What is 2 + 2?").await;
    assert!(!react.success);
}

#[tokio::test]
async fn e2e_bench_over_generated_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_dir = dir.path().join("test_cases");
    TestCorpus::default_corpus().save_split(&corpus_dir).unwrap();
    let corpus = TestCorpus::load(&corpus_dir.join("all_test_cases.json")).unwrap();
    let cases = corpus.flatten(Some("reasoning"));

    // Two cases, one reply each for CoT.
    let provider = scripted(&[
        "**Reasoning:**\nStep 1: 80 * 2.5\n\n**Conclusion:**\n200 km",
        "**Reasoning:**\nStep 1: 100 - 55\n\n**Conclusion:**\n45 dollars",
    ]);
    let agent = PatternKind::ChainOfThought.build(session_for(provider, "CoT-Agent"));
    let mut runner = BenchRunner::new(vec![agent]);

    let report = runner.run(&cases).await;

    assert_eq!(report.total_tests, 2);
    assert_eq!(report.successes(), 2);
    assert_eq!(report.results[0].test_id, "reason_001");
    assert_eq!(report.results[1].response_length, "45 dollars".len());

    let saved = report.save(&dir.path().join("results")).unwrap();
    assert!(saved.exists());
}
