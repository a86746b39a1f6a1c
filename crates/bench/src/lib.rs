//! Pattern comparison harness.
//!
//! A [`TestCorpus`] holds categorized queries; a [`BenchRunner`] pushes every
//! query through every engine and collects a [`RunReport`] that can be
//! summarized per engine and saved as JSON.

pub mod corpus;
pub mod report;
pub mod runner;

pub use corpus::{CorpusSummary, Difficulty, TestCase, TestCorpus};
pub use report::{AgentSummary, RunReport, RunResult};
pub use runner::BenchRunner;

use std::path::PathBuf;
use thiserror::Error;

/// Corpus and report file errors.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
