//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the tool and resource catalog,
//! invocation dispatch, server lifecycle management, and transport layer
//! abstractions.

pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod server;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{
    Catalog, CatalogBuilder, CatalogError, ResourceDescriptor, ToolDescriptor, UriTemplate,
};
pub use config::{AdvisoryConfig, Config, LoggingConfig, PingConfig};
pub use dispatcher::{
    Dispatcher, InvocationKind, InvocationRequest, InvocationResult, ProtocolError,
    ProtocolErrorKind,
};
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
