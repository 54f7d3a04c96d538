//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - The closed set of tool variants and their metadata
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`) with a params
//!    struct, `to_tool()` and an async `execute()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a `ToolKind` variant and register it in `registry.rs`
//! 4. Route the variant in `core/dispatcher.rs`

pub mod definitions;
mod error;
mod registry;

pub use error::ToolError;
pub use registry::{ToolKind, get_all_tools};
