//! Offline providers: a canned reply for dry runs and a scripted sequence
//! for tests and demos.

use async_trait::async_trait;
use patternlab_core::error::ProviderError;
use patternlab_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

const MOCK_REPLY: &str = "**Reasoning:**
Step 1: Analyzing the question
Step 2: Processing the information
Step 3: Formulating the answer

**Conclusion:**
This is a mock response for testing purposes.";

/// Returns the same reasoning/conclusion reply to every request.
///
/// Used by `--mock` runs so the whole pipeline can be exercised without an
/// API key. ReAct will fail to parse this reply, which is the point: it shows
/// how each pattern degrades on an unexpected format.
pub struct MockProvider {
    reply: String,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            reply: MOCK_REPLY.to_string(),
        }
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Ok(ProviderResponse {
            content: self.reply.clone(),
            model: request.model,
            usage: None,
        })
    }
}

/// A provider that returns a sequence of scripted replies.
///
/// Each call to `complete` pops the next entry. Running past the end of the
/// script is reported as [`ProviderError::Scripted`]. Every request is kept
/// so tests can assert on exactly what the engine sent.
pub struct SequentialMockProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script made only of successful text replies.
    pub fn texts<S: AsRef<str>>(replies: &[S]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.as_ref().to_string())).collect())
    }

    /// A provider that answers once.
    pub fn single_text(text: &str) -> Self {
        Self::texts(&[text])
    }

    /// A provider whose first call fails.
    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(ProviderError::Scripted(message.to_string()))])
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Copies of every request received, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|_| ProviderError::Scripted("request log poisoned".into()))?;
            requests.push(request.clone());
            requests.len()
        };

        let next = self
            .script
            .lock()
            .map_err(|_| ProviderError::Scripted("script poisoned".into()))?
            .pop_front();

        match next {
            Some(Ok(content)) => Ok(ProviderResponse {
                content,
                model: request.model,
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
            }),
            Some(Err(e)) => Err(e),
            None => Err(ProviderError::Scripted(format!(
                "no more responses (call #{call})"
            ))),
        }
    }
}
