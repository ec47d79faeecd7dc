//! Built-in tool implementations for Cogito.
//!
//! Tools give the agent the ability to act: do arithmetic, check the
//! time, look up the weather, search for information. Callers can also
//! register their own `Tool` implementations alongside these.

pub mod calculator;
pub mod current_time;
pub mod search;
pub mod weather_lookup;

use cogito_core::tool::ToolRegistry;

pub use calculator::CalculatorTool;
pub use current_time::CurrentTimeTool;
pub use search::SearchTool;
pub use weather_lookup::WeatherLookupTool;

/// Create a registry with all built-in tools, in a stable order.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    // Built-in names never collide, so these registrations cannot fail.
    let _ = registry.register(Box::new(CalculatorTool));
    let _ = registry.register(Box::new(CurrentTimeTool));
    let _ = registry.register(Box::new(WeatherLookupTool));
    let _ = registry.register(Box::new(SearchTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_builtins_in_order() {
        let registry = default_registry();
        assert_eq!(
            registry.names(),
            vec!["calculator", "current_time", "weather_lookup", "search"]
        );
    }

    #[test]
    fn descriptions_are_stable_across_calls() {
        let registry = default_registry();
        let first = registry.describe_all();
        assert_eq!(first, registry.describe_all());
        assert!(first.lines().next().unwrap().starts_with("calculator: "));
    }
}
