//! Tool trait and registry — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act: do arithmetic,
//! look up data, search. Each tool receives a typed key-value parameter
//! map and returns a tagged result (scalar or structured); failures
//! travel as `ToolError` and are folded into the conversation by the
//! reasoning loop, never swallowed here.

use crate::error::ToolError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Keyword parameters decoded from a parsed `Action`.
pub type ToolParams = serde_json::Map<String, serde_json::Value>;

/// A scalar tool result.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{s}"),
            // Integers render without a trailing ".0"
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// The result of a successful tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A single value, stringified into the observation
    Scalar(Scalar),
    /// A structured value, serialized as JSON into the observation
    Structured(serde_json::Value),
}

impl ToolOutput {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::Scalar(Scalar::Number(n))
    }

    pub fn structured(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// The core Tool trait.
///
/// Each capability implements this trait and is registered in the
/// `ToolRegistry`, which makes it available to the reasoning loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (rendered into every prompt).
    fn description(&self) -> &str;

    /// Execute the tool with the given keyword parameters.
    async fn invoke(&self, params: ToolParams) -> std::result::Result<ToolOutput, ToolError>;
}

/// What to do when a tool is registered under a name that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the existing tool (default, mirrors historical behavior)
    #[default]
    Override,
    /// Refuse the registration
    Reject,
}

/// A registry of available tools, shared read-only by all sessions
/// after startup.
///
/// Registration order is preserved: `describe_all` renders tools in the
/// order they were registered, so the text embedded into prompts is
/// stable across calls.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
    on_duplicate: DuplicatePolicy,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            on_duplicate: DuplicatePolicy::default(),
        }
    }

    /// Set the duplicate-name policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    /// Register a tool.
    ///
    /// Under `DuplicatePolicy::Override` a tool re-registered under an
    /// existing name replaces the previous one and keeps its original
    /// position in the registration order.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> std::result::Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            match self.on_duplicate {
                DuplicatePolicy::Override => {
                    tracing::warn!(tool = %name, "Overriding existing tool registration");
                }
                DuplicatePolicy::Reject => return Err(ToolError::DuplicateName(name)),
            }
        } else {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Render `name: description` for every registered tool, one per
    /// line, in registration order. This text goes verbatim into every
    /// prompt, so its stability matters for prompt caching.
    pub fn describe_all(&self) -> String {
        self.order
            .iter()
            .filter_map(|name| {
                self.tools
                    .get(name)
                    .map(|t| format!("{}: {}", name, t.description()))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a named tool.
    ///
    /// Fails with `ToolError::NotFound` for unregistered names; any
    /// error from the handler itself is returned untouched for the
    /// caller to fold into an observation.
    pub async fn execute(
        &self,
        name: &str,
        params: ToolParams,
    ) -> std::result::Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(params).await
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
            let text = params
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Ok(ToolOutput::text(text))
        }
    }

    struct LoudEchoTool;

    #[async_trait]
    impl Tool for LoudEchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input, loudly"
        }
        async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
            let text = params
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Ok(ToolOutput::text(text.to_uppercase()))
        }
    }

    fn params(json: serde_json::Value) -> ToolParams {
        json.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn describe_all_preserves_registration_order() {
        struct Named(&'static str);

        #[async_trait]
        impl Tool for Named {
            fn name(&self) -> &str {
                self.0
            }
            fn description(&self) -> &str {
                "a tool"
            }
            async fn invoke(&self, _params: ToolParams) -> Result<ToolOutput, ToolError> {
                Ok(ToolOutput::text(""))
            }
        }

        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Box::new(Named(name))).unwrap();
        }

        let description = registry.describe_all();
        let lines: Vec<&str> = description.lines().collect();
        assert_eq!(lines[0], "zeta: a tool");
        assert_eq!(lines[1], "alpha: a tool");
        assert_eq!(lines[2], "mid: a tool");
        // Stable across calls
        assert_eq!(description, registry.describe_all());
    }

    #[test]
    fn duplicate_overrides_by_default() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        registry.register(Box::new(LoudEchoTool)).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("echo").unwrap().description(),
            "Echoes back the input, loudly"
        );
    }

    #[test]
    fn duplicate_rejected_when_configured() {
        let mut registry = ToolRegistry::new().with_duplicate_policy(DuplicatePolicy::Reject);
        registry.register(Box::new(EchoTool)).unwrap();
        let err = registry.register(Box::new(LoudEchoTool)).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateName(_)));
        // Original registration is untouched
        assert_eq!(
            registry.get("echo").unwrap().description(),
            "Echoes back the input"
        );
    }

    #[tokio::test]
    async fn execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();

        let result = registry
            .execute("echo", params(serde_json::json!({"text": "hello world"})))
            .await
            .unwrap();
        assert_eq!(result, ToolOutput::text("hello world"));
    }

    #[tokio::test]
    async fn execute_missing_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("nonexistent", ToolParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn scalar_number_display_drops_integer_fraction() {
        assert_eq!(Scalar::Number(4.0).to_string(), "4");
        assert_eq!(Scalar::Number(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
    }
}
