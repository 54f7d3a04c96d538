//! Tool & resource catalog.
//!
//! The catalog maps tool names and resource URI templates to the closed set
//! of handler variants ([`ToolKind`], [`ResourceKind`]). It is assembled once
//! by a [`CatalogBuilder`] during server startup and is read-only afterwards:
//! a built [`Catalog`] exposes lookups only, so dispatch never mutates it and
//! it can be shared freely between concurrent invocations.

use std::collections::HashMap;

use rmcp::model::{AnnotateAble, RawResourceTemplate, ResourceTemplate, Tool};
use thiserror::Error;
use tracing::{debug, info};

use crate::domains::resources::{ResourceKind, get_all_resource_templates};
use crate::domains::tools::{ToolKind, get_all_tools};

/// Errors raised while assembling the catalog.
///
/// All of them are startup-time configuration errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A tool with this name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// A resource with this URI template is already registered.
    #[error("Duplicate resource URI template: {0}")]
    DuplicateResource(String),

    /// The URI template could not be parsed.
    #[error("Invalid URI template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

impl CatalogError {
    fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// URI templates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A URI template with `{name}` placeholders (RFC 6570 level 1 subset).
///
/// A placeholder binds a non-empty run of characters without `/`. Bound
/// values are percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Parse a template such as `advisory://country/{country}`.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(start) = rest.find('{') {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let end = rest[start..]
                .find('}')
                .map(|offset| start + offset)
                .ok_or_else(|| CatalogError::invalid_template(raw, "unclosed placeholder"))?;

            let name = &rest[start + 1..end];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(CatalogError::invalid_template(
                    raw,
                    format!("invalid placeholder name '{}'", name),
                ));
            }
            // Two placeholders in a row cannot be split unambiguously
            if matches!(segments.last(), Some(Segment::Param(_))) {
                return Err(CatalogError::invalid_template(raw, "adjacent placeholders"));
            }

            segments.push(Segment::Param(name.to_string()));
            rest = &rest[end + 1..];
        }

        if rest.contains('}') {
            return Err(CatalogError::invalid_template(raw, "unbalanced '}'"));
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a concrete URI, returning the bound placeholder values.
    pub fn matches(&self, uri: &str) -> Option<HashMap<String, String>> {
        let mut bound = HashMap::new();
        let mut rest = uri;
        let mut segments = self.segments.iter().peekable();

        while let Some(segment) = segments.next() {
            match segment {
                Segment::Literal(literal) => {
                    rest = rest.strip_prefix(literal.as_str())?;
                }
                Segment::Param(name) => {
                    let end = match segments.peek() {
                        Some(Segment::Literal(next)) => rest.find(next.as_str())?,
                        _ => rest.len(),
                    };
                    let value = &rest[..end];
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    let decoded = urlencoding::decode(value).ok()?;
                    bound.insert(name.clone(), decoded.into_owned());
                    rest = &rest[end..];
                }
            }
        }

        rest.is_empty().then_some(bound)
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// A registered tool: its handler variant plus the metadata shown to clients.
///
/// `tool.input_schema` is generated from the same parameter struct the
/// dispatcher deserializes into, so the advertised shape is the checked one.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub tool: Tool,
}

impl ToolDescriptor {
    pub fn new(kind: ToolKind, tool: Tool) -> Self {
        Self { kind, tool }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }
}

/// A registered resource template.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub template: UriTemplate,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
}

impl ResourceDescriptor {
    /// Metadata for `resources/templates/list`.
    pub fn to_resource_template(&self) -> ResourceTemplate {
        RawResourceTemplate {
            uri_template: self.template.as_str().to_string(),
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
        }
        .no_annotation()
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable registry of tools and resource templates.
#[derive(Debug, Default)]
pub struct Catalog {
    tools: Vec<ToolDescriptor>,
    tool_index: HashMap<String, usize>,
    resources: Vec<ResourceDescriptor>,
}

impl Catalog {
    /// Start assembling a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The built-in catalog served by this crate.
    pub fn standard() -> Result<Self, CatalogError> {
        let mut builder = Self::builder();
        for descriptor in get_all_tools() {
            builder = builder.register_tool(descriptor)?;
        }
        for descriptor in get_all_resource_templates()? {
            builder = builder.register_resource(descriptor)?;
        }
        Ok(builder.build())
    }

    /// Look up a tool by name.
    pub fn resolve_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tool_index.get(name).map(|&i| &self.tools[i])
    }

    /// Find the first resource template matching `uri`.
    pub fn resolve_resource(
        &self,
        uri: &str,
    ) -> Option<(&ResourceDescriptor, HashMap<String, String>)> {
        self.resources
            .iter()
            .find_map(|descriptor| descriptor.template.matches(uri).map(|bound| (descriptor, bound)))
    }

    /// Tool metadata in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|d| d.tool.clone()).collect()
    }

    /// Resource template metadata in registration order.
    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.resources
            .iter()
            .map(ResourceDescriptor::to_resource_template)
            .collect()
    }
}

/// Builder enforcing name and template uniqueness.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Register a tool; fails if the name is taken.
    pub fn register_tool(mut self, descriptor: ToolDescriptor) -> Result<Self, CatalogError> {
        let name = descriptor.name().to_string();
        if self.catalog.tool_index.contains_key(&name) {
            return Err(CatalogError::DuplicateTool(name));
        }

        debug!("Registering tool: {}", name);
        self.catalog
            .tool_index
            .insert(name, self.catalog.tools.len());
        self.catalog.tools.push(descriptor);
        Ok(self)
    }

    /// Register a resource template; fails if the template is taken.
    pub fn register_resource(
        mut self,
        descriptor: ResourceDescriptor,
    ) -> Result<Self, CatalogError> {
        if self
            .catalog
            .resources
            .iter()
            .any(|existing| existing.template == descriptor.template)
        {
            return Err(CatalogError::DuplicateResource(
                descriptor.template.as_str().to_string(),
            ));
        }

        debug!("Registering resource template: {}", descriptor.template.as_str());
        self.catalog.resources.push(descriptor);
        Ok(self)
    }

    /// Freeze the catalog.
    pub fn build(self) -> Catalog {
        info!(
            "Catalog ready: {} tools, {} resource templates",
            self.catalog.tools.len(),
            self.catalog.resources.len()
        );
        self.catalog
    }
}
