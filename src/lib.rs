//! Travel Advisory MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes
//! travel-related tools and resources to a chat orchestrator.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling,
//!   the catalog, the dispatcher and the MCP server handler
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: MCP tools that can be called by clients (`ping`, `get_time`,
//!     `get_country_info`, `echo`)
//!   - **resources**: Parameterized resources that can be read by clients
//!   - **advisory**: The travel advisory fetcher shared by tools and resources
//!
//! # Example
//!
//! ```rust,no_run
//! use travel_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Dispatcher, Error, McpServer, Result};
