//! Text-generation provider implementations for patternlab.
//!
//! All providers implement the `patternlab_core::Provider` trait.
//! [`router::build_from_config`] selects one from configuration.

pub mod anthropic;
mod http;
pub mod mock;
pub mod openai_compat;
pub mod router;

pub use anthropic::AnthropicProvider;
pub use mock::{MockProvider, SequentialMockProvider};
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
