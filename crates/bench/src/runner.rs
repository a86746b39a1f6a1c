//! Sequential comparison runner.

use patternlab_agent::AgentPattern;
use std::time::Instant;
use tracing::{debug, info};

use crate::corpus::TestCase;
use crate::report::{RunReport, RunResult};

/// Runs every test case through every engine, one at a time.
pub struct BenchRunner {
    agents: Vec<Box<dyn AgentPattern>>,
}

impl BenchRunner {
    pub fn new(agents: Vec<Box<dyn AgentPattern>>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[Box<dyn AgentPattern>] {
        &self.agents
    }

    /// Run all cases. Each engine's history is reset after every case so
    /// cases do not leak context into each other; engine stats accumulate.
    pub async fn run(&mut self, cases: &[TestCase]) -> RunReport {
        info!(
            cases = cases.len(),
            agents = self.agents.len(),
            total = cases.len() * self.agents.len(),
            "Starting pattern comparison"
        );

        let mut results = Vec::with_capacity(cases.len() * self.agents.len());
        for case in cases {
            for agent in &mut self.agents {
                let result = run_case(agent.as_mut(), case).await;
                debug!(
                    agent = %result.agent,
                    test = %result.test_id,
                    success = result.success,
                    "Case finished"
                );
                results.push(result);
                agent.reset();
            }
        }

        RunReport::new(results)
    }
}

async fn run_case(agent: &mut dyn AgentPattern, case: &TestCase) -> RunResult {
    let start = Instant::now();
    let outcome = agent.process(&case.query).await;
    let duration_secs = start.elapsed().as_secs_f64();

    RunResult {
        agent: agent.kind().label().to_string(),
        test_id: case.id.clone(),
        query: case.query.clone(),
        category: case.category.clone(),
        success: outcome.success,
        duration_secs,
        actions_count: outcome.actions_taken.len(),
        tool_calls: outcome.tool_calls.len(),
        response_length: outcome.content.chars().count(),
        error: outcome.error,
    }
}
