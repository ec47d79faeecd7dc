//! `cogito recall` — Recall archived memories for a user and date.

use chrono::{Datelike, NaiveDate};
use cogito_agent::AgentRuntime;
use cogito_config::AppConfig;

pub async fn run(user: &str, date: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;

    let runtime = AgentRuntime::from_config(&config);
    let result = runtime
        .recall(user, parsed.year(), parsed.month(), parsed.day())
        .await;

    println!("{result}");
    Ok(())
}
