//! Current time tool.

use async_trait::async_trait;
use chrono::Utc;
use cogito_core::error::ToolError;
use cogito_core::tool::{Tool, ToolOutput, ToolParams};

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time (UTC). Takes no parameters."
    }

    async fn invoke(&self, _params: ToolParams) -> Result<ToolOutput, ToolError> {
        let now = Utc::now();
        Ok(ToolOutput::text(format!(
            "Current time: {} UTC",
            now.format("%Y-%m-%d %H:%M:%S")
        )))
    }
}
