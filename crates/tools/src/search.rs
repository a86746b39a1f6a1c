//! Search tool: simulated lookup against a small keyword knowledge base.
//!
//! Topics are checked in order and the first keyword contained in the query
//! wins. Queries matching nothing get a generic answer whose result count is
//! derived from the query text, so repeated runs are identical.

use async_trait::async_trait;
use patternlab_core::error::ToolError;
use patternlab_core::tool::Tool;

const KNOWLEDGE_BASE: &[(&str, &str)] = &[
    ("python", "Python is a high-level, interpreted programming language known for its simplicity and readability."),
    ("ai", "Artificial Intelligence (AI) refers to the simulation of human intelligence in machines."),
    ("machine learning", "Machine Learning is a subset of AI that enables systems to learn from data."),
    ("agent", "An AI agent is a software entity that can perceive its environment and take actions."),
    ("react", "ReAct is an agent pattern that combines reasoning and acting in an interleaved manner."),
    ("weather", "Weather information varies by location. Current conditions include temperature, humidity, and precipitation."),
    ("rust", "Rust is a systems programming language focused on safety, speed, and concurrency."),
];

pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Searches for information on a given topic. Returns relevant information (simulated)."
    }

    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput("Missing search query".into()));
        }

        Ok(search(query))
    }
}

fn search(query: &str) -> String {
    let q = query.to_lowercase();

    if let Some((_, entry)) = KNOWLEDGE_BASE.iter().find(|(key, _)| q.contains(key)) {
        return format!("Search results for '{query}': {entry}");
    }

    let count = 10 + query_hash(&q) % 91;
    format!(
        "Search results for '{query}': Found {count} results. Here are some key points: {q} is a topic with multiple aspects. Further research recommended."
    )
}

fn query_hash(text: &str) -> u32 {
    text.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}
