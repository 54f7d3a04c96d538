//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI template and metadata
//! - A `read` function producing its content
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

pub mod travel_advisory;

pub use travel_advisory::{TravelAdvisoryParams, TravelAdvisoryResource};

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata.
pub trait ResourceDefinition {
    /// The URI template, with `{name}` placeholders.
    const URI_TEMPLATE: &'static str;

    /// The programmatic name of the resource.
    const NAME: &'static str;

    /// Human-readable title.
    const TITLE: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;
}
