//! Weather lookup tool — stub that returns mock weather data.
//!
//! In production this would call a real weather API (Open-Meteo, etc.).
//! The stub returns deterministic, plausible data so the agent loop can
//! be exercised end-to-end without network access.

use async_trait::async_trait;
use cogito_core::error::ToolError;
use cogito_core::tool::{Tool, ToolOutput, ToolParams};
use serde::Serialize;

pub struct WeatherLookupTool;

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        "weather_lookup"
    }

    fn description(&self) -> &str {
        "Look up current weather conditions for a location. Parameters: {\"location\": string}"
    }

    async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
        let location = params
            .get("location")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'location' parameter".into()))?;

        let report = mock_report(location);
        let value = serde_json::to_value(&report).map_err(|e| ToolError::ExecutionFailed {
            tool_name: "weather_lookup".into(),
            reason: e.to_string(),
        })?;

        Ok(ToolOutput::structured(value))
    }
}

#[derive(Serialize)]
struct WeatherReport {
    location: String,
    temperature_c: f64,
    conditions: String,
    humidity_pct: u32,
    wind_kmh: f64,
}

/// Deterministic mock weather keyed by a hash of the location name.
fn mock_report(location: &str) -> WeatherReport {
    let seed: u32 = location
        .bytes()
        .fold(7u32, |acc, b| acc.wrapping_mul(37).wrapping_add(b as u32));

    let conditions = [
        "Clear skies",
        "Partly cloudy",
        "Overcast",
        "Light rain",
        "Thunderstorms",
        "Snow",
    ];

    WeatherReport {
        location: location.to_string(),
        temperature_c: ((seed % 38) as f64) - 6.0,
        conditions: conditions[(seed as usize / 5) % conditions.len()].to_string(),
        humidity_pct: 25 + (seed % 65),
        wind_kmh: ((seed % 25) as f64) + 3.0,
    }
}
