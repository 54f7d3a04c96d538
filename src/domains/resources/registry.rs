//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a variant and register it here in `get_all_resource_templates()`

use crate::core::catalog::{CatalogError, ResourceDescriptor, UriTemplate};

use super::definitions::{ResourceDefinition, TravelAdvisoryResource};

/// Handler variant of a registered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    TravelAdvisory,
}

/// Build a catalog descriptor from a definition.
fn build_descriptor<R: ResourceDefinition>(
    kind: ResourceKind,
) -> Result<ResourceDescriptor, CatalogError> {
    Ok(ResourceDescriptor {
        kind,
        template: UriTemplate::parse(R::URI_TEMPLATE)?,
        name: R::NAME.to_string(),
        title: Some(R::TITLE.to_string()),
        description: Some(R::DESCRIPTION.to_string()),
        mime_type: Some(R::MIME_TYPE.to_string()),
    })
}

/// Get all registered resource templates as catalog descriptors.
///
/// This is the central place where all resources are registered.
pub fn get_all_resource_templates() -> Result<Vec<ResourceDescriptor>, CatalogError> {
    Ok(vec![build_descriptor::<TravelAdvisoryResource>(
        ResourceKind::TravelAdvisory,
    )?])
}
