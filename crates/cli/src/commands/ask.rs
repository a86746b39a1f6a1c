//! `patternlab ask`: run one query and print each pattern's outcome.

use patternlab_agent::{AgentPattern, PatternKind};
use patternlab_core::Outcome;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use super::{build_agents, enabled_kinds, load_config};

pub async fn run(
    query: &str,
    pattern: &str,
    mock: bool,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let kinds = if pattern.eq_ignore_ascii_case("all") {
        enabled_kinds(&config)
    } else {
        vec![pattern.parse::<PatternKind>()?]
    };
    if kinds.is_empty() {
        return Err("No patterns enabled in [agents]".into());
    }

    debug!(patterns = ?kinds, mock, "Running query");
    let mut agents = build_agents(&config, &kinds, mock)?;

    println!("❓ {query}");
    for agent in &mut agents {
        let start = Instant::now();
        let outcome = agent.process(query).await;
        print_outcome(agent.as_ref(), &outcome, start.elapsed().as_secs_f64());
    }

    Ok(())
}

fn print_outcome(agent: &dyn AgentPattern, outcome: &Outcome, secs: f64) {
    let status = if outcome.success { "✅" } else { "❌" };

    println!();
    println!("{status} {} ({}, {secs:.2}s)", agent.kind().label(), agent.name());

    if let Some(reasoning) = &outcome.reasoning {
        println!("   Reasoning:");
        for line in reasoning.lines().filter(|l| !l.trim().is_empty()) {
            println!("     {line}");
        }
    }

    if !outcome.actions_taken.is_empty() {
        println!("   Actions:");
        for action in &outcome.actions_taken {
            println!("     • {action}");
        }
    }

    println!("   Answer:");
    for line in outcome.content.lines() {
        println!("     {line}");
    }

    if let Some(error) = &outcome.error {
        println!("   Error: {error}");
    }

    let stats = agent.stats();
    println!(
        "   Stats: {} queries, {:.0}% success, {} tool calls",
        stats.total_queries,
        stats.success_rate() * 100.0,
        stats.total_tool_calls
    );
}
