//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler. It implements the MCP
//! protocol by turning protocol requests into dispatcher invocations and
//! dispatcher errors back into MCP error objects.
//!
//! Tools and resource templates live in the catalog built at startup;
//! adding one means registering it in its domain registry, not touching
//! this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::*,
    service::RequestContext,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use super::config::Config;
use super::dispatcher::{
    Dispatcher, InvocationKind, InvocationRequest, InvocationResult, ProtocolError,
    ProtocolErrorKind,
};
use super::error::Result;

/// The main MCP server handler.
///
/// Clones share the same dispatcher, so they share the catalog and the
/// `ping` latency toggle.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Catalog and handler state.
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails when the configuration is invalid or the catalog cannot be
    /// built; the server must not start in that case.
    pub fn new(config: Config) -> Result<Self> {
        let dispatcher = Dispatcher::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Tool definitions, in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.catalog().tools()
    }

    /// Resource templates, in registration order.
    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.dispatcher.catalog().resource_templates()
    }

    /// Call a tool, honouring the configured call deadline.
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request = InvocationRequest::tool(name, arguments.unwrap_or_default());

        self.invoke(request)
            .await
            .map(InvocationResult::into_call_tool_result)
            .map_err(|e| to_mcp_error(e, InvocationKind::Tool))
    }

    /// Read a resource, honouring the configured call deadline.
    pub async fn read_resource_by_uri(
        &self,
        uri: &str,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        self.invoke(InvocationRequest::resource(uri))
            .await
            .map(|result| result.into_read_resource_result(uri))
            .map_err(|e| to_mcp_error(e, InvocationKind::Resource))
    }

    async fn invoke(
        &self,
        request: InvocationRequest,
    ) -> std::result::Result<InvocationResult, ProtocolError> {
        match self.call_timeout() {
            Some(deadline) => self.dispatcher.invoke_with_deadline(request, deadline).await,
            None => self.dispatcher.invoke(request).await,
        }
    }

    fn call_timeout(&self) -> Option<Duration> {
        self.config.server.call_timeout()
    }
}

/// Map a dispatch error onto an MCP error object.
///
/// An unknown resource is reported with the dedicated resource code; an
/// unknown tool is an invalid `name` parameter of `tools/call`.
pub fn to_mcp_error(err: ProtocolError, kind: InvocationKind) -> McpError {
    let message = err.message;
    match (err.kind, kind) {
        (ProtocolErrorKind::NotFound, InvocationKind::Resource) => {
            McpError::resource_not_found(message, None)
        }
        (ProtocolErrorKind::NotFound, InvocationKind::Tool)
        | (ProtocolErrorKind::InvalidParams, _) => McpError::invalid_params(message, None),
        (ProtocolErrorKind::HandlerFailure, _) | (ProtocolErrorKind::Timeout, _) => {
            McpError::internal_error(message, None)
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Travel helper server. Tools: ping (alternating latency), get_time (UTC timestamp), \
                 get_country_info (security advice for a country named in French), echo. \
                 Resource template advisory://country/{country} exposes the same advice."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        self.call_tool_by_name(&request.name, request.arguments)
            .await
    }

    /// No concrete resources: advice pages are only reachable through the
    /// resource template.
    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: Vec::new(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        Ok(ListResourceTemplatesResult {
            resource_templates: self.resource_templates(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.read_resource_by_uri(&request.uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PingConfig;
    use serde_json::json;

    fn test_server() -> McpServer {
        let mut config = Config::default();
        config.ping = PingConfig {
            short_ms: 1,
            long_ms: 80,
        };
        config.advisory.base_url = "http://127.0.0.1:9/".to_string();
        McpServer::new(config).unwrap()
    }

    #[test]
    fn test_server_exposes_catalog() {
        let server = test_server();
        let names: Vec<String> = server.tools().iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names, vec!["ping", "get_time", "get_country_info", "echo"]);
        assert_eq!(server.resource_templates().len(), 1);
        assert_eq!(server.name(), "travel-mcp-server");
    }

    #[test]
    fn test_invalid_config_refuses_to_start() {
        let mut config = Config::default();
        config.advisory.base_url = "file:///tmp".to_string();
        assert!(McpServer::new(config).is_err());
    }

    #[test]
    fn test_get_info_capabilities() {
        let info = test_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "travel-mcp-server");
    }

    #[test]
    fn test_error_code_mapping() {
        let cases = [
            (ProtocolError::not_found("x"), InvocationKind::Tool, ErrorCode::INVALID_PARAMS),
            (
                ProtocolError::not_found("x"),
                InvocationKind::Resource,
                ErrorCode::RESOURCE_NOT_FOUND,
            ),
            (ProtocolError::invalid_params("x"), InvocationKind::Tool, ErrorCode::INVALID_PARAMS),
            (
                ProtocolError::handler_failure("x"),
                InvocationKind::Tool,
                ErrorCode::INTERNAL_ERROR,
            ),
            (ProtocolError::timeout("x"), InvocationKind::Resource, ErrorCode::INTERNAL_ERROR),
        ];

        for (err, kind, code) in cases {
            assert_eq!(to_mcp_error(err, kind).code, code);
        }
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_invalid_params() {
        let err = test_server()
            .call_tool_by_name("nonexistent", None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("nonexistent"));
    }

    #[tokio::test]
    async fn test_call_echo() {
        let arguments = json!({ "message": "bonjour" }).as_object().cloned();
        let result = test_server()
            .call_tool_by_name("echo", arguments)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn test_read_unknown_resource() {
        let err = test_server()
            .read_resource_by_uri("advisory://nowhere")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_configured_deadline_applies() {
        let mut config = Config::default();
        config.server.call_timeout_ms = Some(20);
        config.ping = PingConfig {
            short_ms: 1,
            long_ms: 200,
        };
        let server = McpServer::new(config).unwrap();

        assert!(server.call_tool_by_name("ping", None).await.is_ok());
        let err = server.call_tool_by_name("ping", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_clones_share_ping_state() {
        let server = test_server();
        let clone = server.clone();

        server.call_tool_by_name("ping", None).await.unwrap();
        let second = clone.call_tool_by_name("ping", None).await.unwrap();

        let text = match &second.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        };
        assert!(text.starts_with("pong [long]"), "{}", text);
    }
}
