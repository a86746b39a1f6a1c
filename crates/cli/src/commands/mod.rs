pub mod ask;
pub mod bench;
pub mod config_cmd;
pub mod corpus;

use patternlab_agent::{AgentPattern, AgentSession, PatternKind};
use patternlab_config::{AppConfig, ConfigError};
use std::path::PathBuf;
use std::sync::Arc;

/// Load config from an explicit file, or from the default location.
pub fn load_config(path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => {
            let mut config = AppConfig::load_from(&path)?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config.validate()?;
            Ok(config)
        }
        None => AppConfig::load(),
    }
}

/// Build one engine per requested kind, sharing a provider and tool registry.
pub fn build_agents(
    config: &AppConfig,
    kinds: &[PatternKind],
    mock: bool,
) -> Result<Vec<Box<dyn AgentPattern>>, Box<dyn std::error::Error>> {
    let provider = patternlab_providers::build_from_config(config, mock)?;
    let tools = Arc::new(patternlab_tools::registry_from_config(&config.tools));

    Ok(kinds
        .iter()
        .map(|kind| {
            let session = AgentSession::from_config(
                kind.agent_name(),
                provider.clone(),
                tools.clone(),
                &config.llm,
            );
            kind.build_configured(session, &config.agents)
        })
        .collect())
}

/// Every pattern enabled in `[agents]`.
pub fn enabled_kinds(config: &AppConfig) -> Vec<PatternKind> {
    PatternKind::ALL
        .into_iter()
        .filter(|kind| kind.is_enabled(&config.agents))
        .collect()
}
