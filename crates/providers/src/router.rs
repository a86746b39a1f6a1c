//! Provider selection from configuration.

use patternlab_config::AppConfig;
use patternlab_core::error::ProviderError;
use patternlab_core::provider::Provider;
use std::sync::Arc;
use tracing::info;

use crate::anthropic::AnthropicProvider;
use crate::mock::MockProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured text-generation provider.
///
/// With `mock` set (or `llm.provider = "mock"`) no network provider is built.
/// Hosted providers other than local ones require an API key.
pub fn build_from_config(
    config: &AppConfig,
    mock: bool,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.llm.provider.as_str();

    if mock || name == "mock" {
        info!("Using mock provider");
        return Ok(Arc::new(MockProvider::new()));
    }

    let api_key = match (&config.llm.api_key, requires_key(name)) {
        (Some(key), _) => key.clone(),
        (None, false) => String::new(),
        (None, true) => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{name}'"
            )));
        }
    };

    let base_url = match (&config.llm.api_url, default_base_url(name)) {
        (Some(url), _) => url.clone(),
        (None, Some(url)) => url.to_string(),
        (None, None) => {
            return Err(ProviderError::NotConfigured(format!(
                "unknown provider '{name}' needs llm.api_url"
            )));
        }
    };

    info!(provider = %name, model = %config.llm.model, "Using provider");

    let provider: Arc<dyn Provider> = if name == "anthropic" {
        Arc::new(AnthropicProvider::new(api_key).with_base_url(base_url))
    } else {
        Arc::new(OpenAiCompatProvider::new(name, base_url, api_key))
    };

    Ok(provider)
}

fn requires_key(provider_name: &str) -> bool {
    !matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Base URLs of the providers that work without `llm.api_url`.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    Some(match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "anthropic" => "https://api.anthropic.com",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    })
}
