//! Weather tool: returns simulated current conditions for a location.
//!
//! Values are derived from a hash of the location name, so the same city
//! always reports the same weather.

use async_trait::async_trait;
use patternlab_core::error::ToolError;
use patternlab_core::tool::Tool;

const CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Windy"];

pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Gets current weather information for a given location. Input should be a city name."
    }

    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        let location = input.trim();
        if location.is_empty() {
            return Err(ToolError::InvalidInput("Missing location".into()));
        }

        let w = generate_mock_weather(location);
        Ok(format!(
            "Weather in {}: {}, {}°C, Humidity: {}%, Wind: {} km/h",
            location, w.conditions, w.temperature, w.humidity, w.wind_speed
        ))
    }
}

struct WeatherData {
    temperature: i32,
    conditions: &'static str,
    humidity: u32,
    wind_speed: u32,
}

/// Generate deterministic mock weather based on location name hash.
fn generate_mock_weather(location: &str) -> WeatherData {
    let hash: u32 = location
        .to_lowercase()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));

    WeatherData {
        temperature: (hash % 46) as i32 - 10, // -10 to 35°C
        conditions: CONDITIONS[(hash as usize / 7) % CONDITIONS.len()],
        humidity: 30 + (hash / 3) % 61,
        wind_speed: (hash / 11) % 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_returns_weather() {
        let result = WeatherTool.execute("Tokyo").await.unwrap();
        assert!(result.starts_with("Weather in Tokyo: "));
        assert!(result.contains("°C"));
        assert!(result.contains("Humidity: "));
        assert!(result.ends_with(" km/h"));
    }

    #[tokio::test]
    async fn deterministic_results() {
        let r1 = WeatherTool.execute("London").await.unwrap();
        let r2 = WeatherTool.execute("  London ").await.unwrap();
        assert_eq!(r1, r2);
    }

    #[test]
    fn values_in_range() {
        for city in ["Paris", "Lagos", "Lima", "Oslo", "Seoul"] {
            let w = generate_mock_weather(city);
            assert!((-10..=35).contains(&w.temperature));
            assert!((30..=90).contains(&w.humidity));
            assert!(w.wind_speed <= 30);
        }
    }

    #[tokio::test]
    async fn missing_location_returns_error() {
        assert!(WeatherTool.execute("").await.is_err());
    }
}
