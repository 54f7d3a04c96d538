//! Echo tool definition.
//!
//! Sends the message back, prefixed with `Echo: `. Useful to check that the
//! orchestrator can reach the server and pass parameters through.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::tools::ToolError;

/// Parameters for the echo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoParams {
    /// The message to echo back.
    #[schemars(description = "The message to echo back")]
    pub message: String,
}

/// Echo tool.
pub struct EchoTool;

impl EchoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "echo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "A simple echo tool";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(len = params.message.len()))]
    pub async fn execute(params: EchoParams) -> Result<Vec<Content>, ToolError> {
        info!("Echo tool called");
        Ok(vec![Content::text(format!("Echo: {}", params.message))])
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<EchoParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
