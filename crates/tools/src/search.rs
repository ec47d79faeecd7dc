//! Information search tool — placeholder until a real search backend
//! is wired in.

use async_trait::async_trait;
use cogito_core::error::ToolError;
use cogito_core::tool::{Tool, ToolOutput, ToolParams};

pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search for information on a topic. Parameters: {\"query\": string}"
    }

    async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
        let query = params
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' parameter".into()))?;

        Ok(ToolOutput::text(format!(
            "Search results for '{query}': no search backend is configured, so no results are available."
        )))
    }
}
