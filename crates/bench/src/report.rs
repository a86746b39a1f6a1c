//! Run results and the saved comparison report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::BenchError;
use crate::corpus::write_json;

/// One (engine, test case) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub agent: String,
    pub test_id: String,
    pub query: String,
    pub category: String,
    pub success: bool,
    /// Wall-clock seconds spent in `process`.
    pub duration_secs: f64,
    pub actions_count: usize,
    pub tool_calls: usize,
    pub response_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregates for one engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub agent: String,
    pub tests: usize,
    pub successes: usize,
    pub failures: usize,
    pub avg_duration_secs: f64,
    pub avg_actions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub total_tests: usize,
    pub results: Vec<RunResult>,
}

impl RunReport {
    pub fn new(results: Vec<RunResult>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            total_tests: results.len(),
            results,
        }
    }

    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failures(&self) -> usize {
        self.total_tests - self.successes()
    }

    /// Per-engine aggregates, in the order engines first appear.
    pub fn summary(&self) -> Vec<AgentSummary> {
        let mut agents: Vec<&str> = Vec::new();
        for r in &self.results {
            if !agents.contains(&r.agent.as_str()) {
                agents.push(&r.agent);
            }
        }

        agents
            .into_iter()
            .map(|agent| {
                let runs: Vec<&RunResult> =
                    self.results.iter().filter(|r| r.agent == agent).collect();
                let tests = runs.len();
                let successes = runs.iter().filter(|r| r.success).count();
                let n = tests as f64;
                AgentSummary {
                    agent: agent.to_string(),
                    tests,
                    successes,
                    failures: tests - successes,
                    avg_duration_secs: runs.iter().map(|r| r.duration_secs).sum::<f64>() / n,
                    avg_actions: runs.iter().map(|r| r.actions_count).sum::<usize>() as f64 / n,
                }
            })
            .collect()
    }

    /// File name used by [`save`](Self::save).
    pub fn file_name(&self) -> String {
        format!("test_results_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Write the report into `dir` and return the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, BenchError> {
        let path = dir.join(self.file_name());
        write_json(&path, self)?;
        info!(path = %path.display(), tests = self.total_tests, "Saved run report");
        Ok(path)
    }
}
