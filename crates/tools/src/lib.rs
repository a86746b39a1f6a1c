//! Built-in tool implementations for patternlab.
//!
//! Tools give the agent patterns something to act on: do math, look things
//! up, and check the weather. Search and weather are deterministic
//! simulations so comparison runs are reproducible offline.

pub mod calculator;
pub mod search;
pub mod weather;

use patternlab_config::ToolsConfig;
use patternlab_core::tool::ToolRegistry;
use tracing::debug;

pub use calculator::{CalcError, CalculatorTool};
pub use search::SearchTool;
pub use weather::WeatherTool;

/// Create a registry with every built-in tool.
pub fn default_registry() -> ToolRegistry {
    registry_from_config(&ToolsConfig::default())
}

/// Create a registry with the tools enabled in configuration.
pub fn registry_from_config(config: &ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    if config.calculator.enabled {
        registry.register(Box::new(CalculatorTool));
    }
    if config.search.enabled {
        registry.register(Box::new(SearchTool));
    }
    if config.weather.enabled {
        registry.register(Box::new(WeatherTool));
    }
    debug!(tools = ?registry.names(), "Tool registry built");
    registry
}
