//! Advisory-specific error types.

use thiserror::Error;

/// Errors raised while fetching or reading an advisory page.
///
/// Only [`AdvisoryError::Client`] and [`AdvisoryError::Selector`] ever leave
/// this module, at construction time; lookup failures are absorbed.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// The configured section id does not make a valid CSS selector.
    #[error("Invalid section selector: {0}")]
    Selector(String),

    /// The request failed before a response was received.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),
}
