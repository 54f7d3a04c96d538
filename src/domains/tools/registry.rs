//! Tool Registry - the closed set of tools served by this crate.
//!
//! Every tool has a [`ToolKind`] variant; the catalog maps tool names to these
//! variants and the dispatcher matches on them. When adding a new tool:
//! 1. Create the tool file in `definitions/`
//! 2. Add a variant here and register it in `get_all_tools()`

use crate::core::catalog::ToolDescriptor;

use super::definitions::{CountryInfoTool, EchoTool, GetTimeTool, PingTool};

/// Handler variant of a registered tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Ping,
    GetTime,
    GetCountryInfo,
    Echo,
}

/// Get all tools as catalog descriptors.
///
/// This is the single source of truth for the tools the server exposes.
pub fn get_all_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(ToolKind::Ping, PingTool::to_tool()),
        ToolDescriptor::new(ToolKind::GetTime, GetTimeTool::to_tool()),
        ToolDescriptor::new(ToolKind::GetCountryInfo, CountryInfoTool::to_tool()),
        ToolDescriptor::new(ToolKind::Echo, EchoTool::to_tool()),
    ]
}
