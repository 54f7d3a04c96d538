//! Get time tool definition.
//!
//! Returns the current UTC time as an RFC 3339 timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domains::tools::ToolError;

/// The get_time tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetTimeParams {}

/// Get time tool - reports the server's wall-clock time.
pub struct GetTimeTool;

impl GetTimeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_time";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get the current date and time (UTC) as an RFC 3339 timestamp.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(_params: GetTimeParams) -> Result<Vec<Content>, ToolError> {
        let now = Self::now()?;
        debug!("Current time: {}", now);
        Ok(vec![Content::text(now.to_rfc3339())])
    }

    /// Read the system clock.
    ///
    /// A clock set before the Unix epoch or beyond chrono's range is an
    /// invocation failure.
    fn now() -> Result<DateTime<Utc>, ToolError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ToolError::clock_unavailable(e.to_string()))?;

        let secs = i64::try_from(since_epoch.as_secs())
            .map_err(|_| ToolError::clock_unavailable("system time out of range"))?;

        DateTime::<Utc>::from_timestamp(secs, since_epoch.subsec_nanos())
            .ok_or_else(|| ToolError::clock_unavailable("system time out of range"))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetTimeParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
