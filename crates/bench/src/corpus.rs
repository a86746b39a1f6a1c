//! Test-case corpus: category → ordered list of queries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::BenchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub query: String,
    #[serde(default)]
    pub expected_tools: Vec<String>,
    pub difficulty: Difficulty,
    /// Finer-grained label than the corpus category (e.g. "calculation").
    #[serde(default = "unknown_category")]
    pub category: String,
}

fn unknown_category() -> String {
    "unknown".into()
}

impl TestCase {
    fn new(id: &str, query: &str, tools: &[&str], difficulty: Difficulty, category: &str) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            expected_tools: tools.iter().map(|t| t.to_string()).collect(),
            difficulty,
            category: category.into(),
        }
    }
}

/// Case counts for a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_cases: usize,
    pub categories: BTreeMap<String, usize>,
    pub difficulty_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCorpus {
    categories: BTreeMap<String, Vec<TestCase>>,
}

impl TestCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, cases: Vec<TestCase>) {
        self.categories.insert(category.into(), cases);
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn get(&self, category: &str) -> Option<&[TestCase]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Total number of cases across categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cases in category order, optionally restricted to one category.
    pub fn flatten(&self, category: Option<&str>) -> Vec<TestCase> {
        self.categories
            .iter()
            .filter(|(name, _)| category.is_none_or(|c| c == name.as_str()))
            .flat_map(|(_, cases)| cases.iter().cloned())
            .collect()
    }

    pub fn summary(&self) -> CorpusSummary {
        let mut difficulty_distribution = BTreeMap::new();
        for case in self.categories.values().flatten() {
            *difficulty_distribution
                .entry(case.difficulty.to_string())
                .or_insert(0) += 1;
        }
        CorpusSummary {
            total_cases: self.len(),
            categories: self
                .categories
                .iter()
                .map(|(name, cases)| (name.clone(), cases.len()))
                .collect(),
            difficulty_distribution,
        }
    }

    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let content = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let corpus: Self =
            serde_json::from_str(&content).map_err(|e| BenchError::json(path, e))?;
        info!(path = %path.display(), cases = corpus.len(), "Loaded test corpus");
        Ok(corpus)
    }

    /// Write the whole corpus as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), BenchError> {
        write_json(path, self)
    }

    /// Write `all_test_cases.json`, one `<category>_test_cases.json` per
    /// category and `test_summary.json` into `dir`.
    pub fn save_split(&self, dir: &Path) -> Result<(), BenchError> {
        self.save(&dir.join("all_test_cases.json"))?;
        for (name, cases) in &self.categories {
            write_json(&dir.join(format!("{name}_test_cases.json")), cases)?;
        }
        write_json(&dir.join("test_summary.json"), &self.summary())?;
        info!(dir = %dir.display(), cases = self.len(), "Saved test corpus");
        Ok(())
    }

    /// The built-in comparison corpus.
    pub fn default_corpus() -> Self {
        use Difficulty::*;

        let mut corpus = Self::new();
        corpus.insert(
            "mathematical",
            vec![
                TestCase::new("math_001", "What is 25 * 4 + 10?", &["calculator"], Easy, "calculation"),
                TestCase::new(
                    "math_002",
                    "Calculate the result of (100 - 25) / 5 and then multiply it by 3",
                    &["calculator"],
                    Medium,
                    "calculation",
                ),
            ],
        );
        corpus.insert(
            "information_retrieval",
            vec![
                TestCase::new("info_001", "What is Python programming language?", &["search"], Easy, "knowledge"),
                TestCase::new(
                    "info_002",
                    "Explain what AI agents are and how they work",
                    &["search"],
                    Medium,
                    "knowledge",
                ),
            ],
        );
        corpus.insert(
            "multi_step",
            vec![
                TestCase::new(
                    "multi_001",
                    "What's the weather in Beijing, and if it's above 20 degrees, calculate what that is in Fahrenheit",
                    &["weather", "calculator"],
                    Medium,
                    "multi_step",
                ),
                TestCase::new(
                    "multi_002",
                    "Search for information about machine learning, then calculate how many years ago it was first introduced if it was created in 1959",
                    &["search", "calculator"],
                    Hard,
                    "multi_step",
                ),
            ],
        );
        corpus.insert(
            "reasoning",
            vec![
                TestCase::new(
                    "reason_001",
                    "If a train travels at 80 km/h for 2.5 hours, how far does it go? Calculate the distance.",
                    &["calculator"],
                    Easy,
                    "reasoning",
                ),
                TestCase::new(
                    "reason_002",
                    "I have 100 dollars. I spend 30% on food and 25% on transport. How much money do I have left?",
                    &["calculator"],
                    Medium,
                    "reasoning",
                ),
            ],
        );
        corpus.insert(
            "planning",
            vec![
                TestCase::new(
                    "plan_001",
                    "Help me plan a data analysis project: what steps should I follow?",
                    &[],
                    Medium,
                    "planning",
                ),
                TestCase::new(
                    "plan_002",
                    "Create a plan to learn Python programming in 3 months",
                    &["search"],
                    Medium,
                    "planning",
                ),
            ],
        );
        corpus
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), BenchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| BenchError::json(path, e))?;
    std::fs::write(path, json).map_err(|e| BenchError::io(path, e))
}
