//! Ping tool definition.
//!
//! A diagnostic tool with alternating latency. Every call flips a toggle owned
//! by the server instance: the first call after startup takes the short path,
//! the second the long path, the third the short path again, and so on. This
//! lets callers observe both their fast path and their timeout handling.
//!
//! Overlapping calls may interleave their flips. Only the observed timing is
//! affected.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::core::config::PingConfig;
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// The ping tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PingParams {}

// ============================================================================
// Latency state
// ============================================================================

/// Latency category of a single ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    Short,
    Long,
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("short"),
            Self::Long => f.write_str("long"),
        }
    }
}

/// Latency toggle shared by every ping handled by one server instance.
#[derive(Debug)]
pub struct PingState {
    /// `true` when the next ping takes the long path.
    slow_next: AtomicBool,
    short: Duration,
    long: Duration,
}

impl PingState {
    /// Fresh state; the first ping is short.
    pub fn new(config: &PingConfig) -> Self {
        Self {
            slow_next: AtomicBool::new(false),
            short: config.short_delay(),
            long: config.long_delay(),
        }
    }

    /// Flip the toggle and return the latency of the current call.
    pub fn next_latency(&self) -> Latency {
        if self.slow_next.fetch_xor(true, Ordering::SeqCst) {
            Latency::Long
        } else {
            Latency::Short
        }
    }

    /// Delay configured for a latency category.
    pub fn delay(&self, latency: Latency) -> Duration {
        match latency {
            Latency::Short => self.short,
            Latency::Long => self.long,
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Ping tool - replies after a short or a long delay, alternately.
pub struct PingTool;

impl PingTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "ping";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Diagnostic ping. Successive calls alternate between a short and a long delay; the reply reports which one was used and the elapsed time.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(
        _params: PingParams,
        state: &PingState,
    ) -> Result<Vec<Content>, ToolError> {
        let latency = state.next_latency();
        let started = Instant::now();

        tokio::time::sleep(state.delay(latency)).await;

        let elapsed = started.elapsed();
        info!("Ping answered on the {} path after {:?}", latency, elapsed);

        Ok(vec![Content::text(format!(
            "pong [{}] elapsed_ms={}",
            latency,
            elapsed.as_millis()
        ))])
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PingParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Ping".into()),
        }
    }
}
