//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type for everything that can go wrong
//! while building or running the server. Errors raised while serving a single
//! invocation are reported as [`ProtocolError`](super::dispatcher::ProtocolError)
//! instead.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog could not be built (duplicate name, bad URI template).
    #[error("Catalog error: {0}")]
    Catalog(#[from] super::catalog::CatalogError),

    /// The travel advisory client could not be set up.
    #[error("Advisory error: {0}")]
    Advisory(#[from] crate::domains::advisory::AdvisoryError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogError;

    #[test]
    fn test_catalog_error_converts() {
        let err: Error = CatalogError::DuplicateTool("ping".to_string()).into();
        assert!(matches!(err, Error::Catalog(_)));
        assert!(err.to_string().contains("ping"));
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::config("bad port");
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }
}
