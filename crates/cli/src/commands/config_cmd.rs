//! `patternlab config`: configuration helpers.

use patternlab_agent::PatternKind;
use patternlab_config::AppConfig;
use patternlab_core::Provider;
use std::path::PathBuf;

use super::load_config;

pub async fn default() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", AppConfig::default_toml());
    Ok(())
}

pub async fn show(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn validate(
    config_path: Option<PathBuf>,
    ping: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   ✅ Config parsed successfully");

    let mut warnings = Vec::new();
    if !config.has_api_key() && config.llm.provider != "mock" {
        warnings.push("No API key set (set PATTERNLAB_API_KEY or the provider's key variable)");
    }
    if PatternKind::ALL.iter().all(|k| !k.is_enabled(&config.agents)) {
        warnings.push("Every pattern is disabled in [agents]");
    }

    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    let enabled: Vec<&str> = PatternKind::ALL
        .iter()
        .filter(|k| k.is_enabled(&config.agents))
        .map(|k| k.as_str())
        .collect();

    println!();
    println!("   Provider:  {}", config.llm.provider);
    println!("   Model:     {}", config.llm.model);
    println!("   Patterns:  {}", enabled.join(", "));
    println!("   Max iters: {}", config.agents.react.max_iterations);
    println!("   Corpus:    {}", config.testing.corpus_path.display());

    if ping {
        println!();
        let provider = patternlab_providers::build_from_config(&config, false)?;
        match provider.health_check().await {
            Ok(true) => println!("   ✅ {} is reachable", provider.name()),
            Ok(false) => println!("   ⚠️  {} answered with an error status", provider.name()),
            Err(e) => println!("   ❌ {} unreachable: {e}", provider.name()),
        }
    }

    Ok(())
}
