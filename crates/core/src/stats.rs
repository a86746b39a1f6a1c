//! Per-engine query counters.
//!
//! Stats belong to one engine instance. Resetting the conversation history
//! leaves them alone; only a full reset clears them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_queries: u64,
    pub successful_queries: u64,
    pub failed_queries: u64,
    pub total_tool_calls: u64,
}

impl Stats {
    /// Record one finished `process` call.
    pub fn record(&mut self, success: bool, tool_calls: usize) {
        self.total_queries += 1;
        if success {
            self.successful_queries += 1;
        } else {
            self.failed_queries += 1;
        }
        self.total_tool_calls += tool_calls as u64;
    }

    /// Fraction of successful queries, 0.0 when nothing ran yet.
    pub fn success_rate(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            self.successful_queries as f64 / self.total_queries as f64
        }
    }
}
