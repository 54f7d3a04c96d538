//! Tool-specific error types.

use thiserror::Error;

/// Errors a tool handler can fail with.
///
/// Tools absorb recoverable failures into their content; returning one of
/// these means the invocation itself failed.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The system clock could not provide a usable time.
    #[error("Clock unavailable: {0}")]
    ClockUnavailable(String),
}

impl ToolError {
    /// Create a new "clock unavailable" error.
    pub fn clock_unavailable(msg: impl Into<String>) -> Self {
        Self::ClockUnavailable(msg.into())
    }
}
