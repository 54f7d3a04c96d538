//! Resources domain module.
//!
//! This module handles all resource-related functionality for the MCP server.
//! Resources are URI-addressable data views; this server exposes them as
//! URI templates whose placeholders become handler parameters.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - The closed set of resource variants and their templates
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Add a `ResourceKind` variant and register it in `registry.rs`
//! 5. Route the variant in `core/dispatcher.rs`

pub mod definitions;
mod registry;

pub use definitions::ResourceDefinition;
pub use registry::{ResourceKind, get_all_resource_templates};
