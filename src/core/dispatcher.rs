//! Invocation dispatch.
//!
//! The [`Dispatcher`] takes an [`InvocationRequest`], resolves its target in
//! the [`Catalog`], validates the parameters against the target's declared
//! shape, runs the handler exactly once and wraps the handler output into an
//! [`InvocationResult`]. Contract violations come back as [`ProtocolError`]s.
//!
//! The dispatcher also owns the per-instance handler state: the `ping`
//! latency toggle and the travel advisory client.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, Content, JsonObject, RawContent, ReadResourceResult, ResourceContents};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::catalog::Catalog;
use super::config::Config;
use super::error::Result;
use crate::domains::advisory::AdvisoryClient;
use crate::domains::resources::ResourceKind;
use crate::domains::resources::definitions::TravelAdvisoryResource;
use crate::domains::tools::definitions::{CountryInfoTool, EchoTool, GetTimeTool, PingState, PingTool};
use crate::domains::tools::{ToolError, ToolKind};

// ============================================================================
// Request / result / error
// ============================================================================

/// What an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    Tool,
    Resource,
}

/// A single call, consumed by [`Dispatcher::invoke`].
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub kind: InvocationKind,
    /// Tool name or resource URI.
    pub target: String,
    pub params: JsonObject,
}

impl InvocationRequest {
    /// Call the tool `name` with `params`.
    pub fn tool(name: impl Into<String>, params: JsonObject) -> Self {
        Self {
            kind: InvocationKind::Tool,
            target: name.into(),
            params,
        }
    }

    /// Read the resource at `uri`.
    pub fn resource(uri: impl Into<String>) -> Self {
        Self {
            kind: InvocationKind::Resource,
            target: uri.into(),
            params: JsonObject::new(),
        }
    }
}

/// Content envelope of a successful invocation.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub content: Vec<Content>,
}

impl InvocationResult {
    pub fn new(content: Vec<Content>) -> Self {
        Self { content }
    }

    /// The text of every text block, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|block| match &block.raw {
                RawContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Envelope for `tools/call`.
    pub fn into_call_tool_result(self) -> CallToolResult {
        CallToolResult::success(self.content)
    }

    /// Envelope for `resources/read`, every text block addressed by `uri`.
    pub fn into_read_resource_result(self, uri: &str) -> ReadResourceResult {
        let contents = self
            .texts()
            .into_iter()
            .map(|text| ResourceContents::text(text, uri))
            .collect();

        ReadResourceResult { contents }
    }
}

/// Category of a dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    /// No tool or resource template matches the target.
    NotFound,
    /// Parameters are missing or of the wrong type.
    InvalidParams,
    /// The handler failed or panicked.
    HandlerFailure,
    /// The caller's deadline passed before the handler finished.
    Timeout,
}

impl fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::InvalidParams => "invalid params",
            Self::HandlerFailure => "handler failure",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// Structured dispatch error returned to the caller.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    pub message: String,
}

impl ProtocolError {
    pub fn new(kind: ProtocolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::NotFound, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::InvalidParams, message)
    }

    pub fn handler_failure(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::HandlerFailure, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Timeout, message)
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

type HandlerFuture<'a> = BoxFuture<'a, std::result::Result<Vec<Content>, ToolError>>;

/// Routes invocations to handlers.
///
/// Dispatch only reads the catalog; the ping toggle is the one piece of
/// mutable state and it is atomic.
#[derive(Debug)]
pub struct Dispatcher {
    catalog: Catalog,
    ping: PingState,
    advisory: AdvisoryClient,
}

impl Dispatcher {
    /// Assemble a dispatcher from its parts.
    pub fn new(catalog: Catalog, ping: PingState, advisory: AdvisoryClient) -> Self {
        Self {
            catalog,
            ping,
            advisory,
        }
    }

    /// Build the standard catalog and handler state from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let catalog = Catalog::standard()?;
        let ping = PingState::new(&config.ping);
        let advisory = AdvisoryClient::new(&config.advisory)?;

        Ok(Self::new(catalog, ping, advisory))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one invocation.
    #[instrument(skip(self, request), fields(kind = ?request.kind, target = %request.target))]
    pub async fn invoke(
        &self,
        request: InvocationRequest,
    ) -> std::result::Result<InvocationResult, ProtocolError> {
        let InvocationRequest {
            kind,
            target,
            params,
        } = request;

        let handler = match kind {
            InvocationKind::Tool => self.tool_handler(&target, params)?,
            InvocationKind::Resource => self.resource_handler(&target, params)?,
        };

        let content = run_handler(&target, handler).await?;
        info!("Invocation of {} returned {} block(s)", target, content.len());

        Ok(InvocationResult::new(content))
    }

    /// Run one invocation, giving up after `deadline`.
    ///
    /// Giving up drops the handler future at its current suspension point;
    /// any state change it already made (such as a ping flip) stays.
    pub async fn invoke_with_deadline(
        &self,
        request: InvocationRequest,
        deadline: Duration,
    ) -> std::result::Result<InvocationResult, ProtocolError> {
        let target = request.target.clone();
        match tokio::time::timeout(deadline, self.invoke(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Invocation of {} exceeded {:?}", target, deadline);
                Err(ProtocolError::timeout(format!(
                    "{} did not complete within {}ms",
                    target,
                    deadline.as_millis()
                )))
            }
        }
    }

    /// Resolve a tool and validate its parameters.
    fn tool_handler(
        &self,
        name: &str,
        params: JsonObject,
    ) -> std::result::Result<HandlerFuture<'_>, ProtocolError> {
        let descriptor = self.catalog.resolve_tool(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ProtocolError::not_found(format!("Unknown tool: {}", name))
        })?;

        let handler = match descriptor.kind {
            ToolKind::Ping => PingTool::execute(parse_params(name, params)?, &self.ping).boxed(),
            ToolKind::GetTime => GetTimeTool::execute(parse_params(name, params)?).boxed(),
            ToolKind::GetCountryInfo => {
                CountryInfoTool::execute(parse_params(name, params)?, &self.advisory).boxed()
            }
            ToolKind::Echo => EchoTool::execute(parse_params(name, params)?).boxed(),
        };

        Ok(handler)
    }

    /// Resolve a resource URI; template bindings override request params.
    fn resource_handler(
        &self,
        uri: &str,
        mut params: JsonObject,
    ) -> std::result::Result<HandlerFuture<'_>, ProtocolError> {
        let (descriptor, bound) = self.catalog.resolve_resource(uri).ok_or_else(|| {
            warn!("Unknown resource requested: {}", uri);
            ProtocolError::not_found(format!("Resource not found: {}", uri))
        })?;

        params.extend(
            bound
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value))),
        );

        let handler = match descriptor.kind {
            ResourceKind::TravelAdvisory => {
                TravelAdvisoryResource::read(parse_params(uri, params)?, &self.advisory)
                    .map(Ok::<_, ToolError>)
                    .boxed()
            }
        };

        Ok(handler)
    }
}

/// Deserialize `params` into the target's parameter struct.
fn parse_params<P: DeserializeOwned>(
    target: &str,
    params: JsonObject,
) -> std::result::Result<P, ProtocolError> {
    serde_json::from_value(serde_json::Value::Object(params)).map_err(|e| {
        warn!("Invalid parameters for {}: {}", target, e);
        ProtocolError::invalid_params(format!("Invalid parameters for {}: {}", target, e))
    })
}

/// Await a handler, turning errors and panics into `HandlerFailure`.
async fn run_handler<F>(target: &str, handler: F) -> std::result::Result<Vec<Content>, ProtocolError>
where
    F: Future<Output = std::result::Result<Vec<Content>, ToolError>>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(Ok(content)) => Ok(content),
        Ok(Err(e)) => {
            error!("Handler for {} failed: {}", target, e);
            Err(ProtocolError::handler_failure(format!("{}: {}", target, e)))
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            error!("Handler for {} panicked: {}", target, reason);
            Err(ProtocolError::handler_failure(format!(
                "{}: handler panicked: {}",
                target, reason
            )))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AdvisoryConfig, PingConfig};
    use crate::domains::advisory::NO_INFORMATION_FOUND;
    use serde_json::json;

    fn test_config(advisory_url: &str) -> Config {
        Config {
            ping: PingConfig {
                short_ms: 1,
                long_ms: 60,
            },
            advisory: AdvisoryConfig {
                base_url: advisory_url.to_string(),
                timeout_secs: 2,
                ..AdvisoryConfig::default()
            },
            ..Config::default()
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::from_config(&test_config("http://127.0.0.1:9/")).unwrap()
    }

    fn params(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    fn latency_of(result: &InvocationResult) -> &str {
        let text = result.texts()[0];
        if text.starts_with("pong [short]") {
            "short"
        } else if text.starts_with("pong [long]") {
            "long"
        } else {
            panic!("unexpected ping reply: {}", text)
        }
    }

    #[tokio::test]
    async fn test_get_time_returns_one_timestamp_block() {
        let dispatcher = dispatcher();

        for _ in 0..2 {
            let result = dispatcher
                .invoke(InvocationRequest::tool("get_time", JsonObject::new()))
                .await
                .unwrap();
            assert_eq!(result.content.len(), 1);
            assert!(chrono::DateTime::parse_from_rfc3339(result.texts()[0]).is_ok());
        }
    }

    #[tokio::test]
    async fn test_ping_alternates_between_calls() {
        let dispatcher = dispatcher();
        let mut categories = Vec::new();

        for _ in 0..3 {
            let result = dispatcher
                .invoke(InvocationRequest::tool("ping", JsonObject::new()))
                .await
                .unwrap();
            categories.push(latency_of(&result).to_string());
        }

        assert_ne!(categories[0], categories[1]);
        assert_ne!(categories[1], categories[2]);
        assert_eq!(categories[0], categories[2]);
        assert_eq!(categories[0], "short");
    }

    #[tokio::test]
    async fn test_ping_state_not_shared_between_dispatchers() {
        let first = dispatcher();
        let second = dispatcher();

        first
            .invoke(InvocationRequest::tool("ping", JsonObject::new()))
            .await
            .unwrap();
        let result = second
            .invoke(InvocationRequest::tool("ping", JsonObject::new()))
            .await
            .unwrap();

        assert_eq!(latency_of(&result), "short");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found_without_side_effects() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .invoke(InvocationRequest::tool("nonexistent", JsonObject::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProtocolErrorKind::NotFound);

        // The ping toggle was not touched
        let result = dispatcher
            .invoke(InvocationRequest::tool("ping", JsonObject::new()))
            .await
            .unwrap();
        assert_eq!(latency_of(&result), "short");
    }

    #[tokio::test]
    async fn test_missing_required_param_is_invalid_params() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .invoke(InvocationRequest::tool("get_country_info", JsonObject::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProtocolErrorKind::InvalidParams);
    }

    #[tokio::test]
    async fn test_mistyped_param_is_invalid_params() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .invoke(InvocationRequest::tool("echo", params(json!({ "message": 42 }))))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProtocolErrorKind::InvalidParams);
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let dispatcher = dispatcher();

        let result = dispatcher
            .invoke(InvocationRequest::tool("echo", params(json!({ "message": "salut" }))))
            .await
            .unwrap();
        assert_eq!(result.texts(), vec!["Echo: salut"]);
    }

    #[tokio::test]
    async fn test_country_info_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pays-test")
            .with_status(200)
            .with_body(r#"<div id="securite">  Avoid travel to border regions.  </div>"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::from_config(&test_config(&server.url())).unwrap();
        let result = dispatcher
            .invoke(InvocationRequest::tool(
                "get_country_info",
                params(json!({ "country_name_in_french": "pays-test" })),
            ))
            .await
            .unwrap();

        assert_eq!(result.texts(), vec!["Avoid travel to border regions."]);
    }

    #[tokio::test]
    async fn test_country_info_http_error_is_successful_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pays-test")
            .with_status(502)
            .create_async()
            .await;

        let dispatcher = Dispatcher::from_config(&test_config(&server.url())).unwrap();
        let result = dispatcher
            .invoke(InvocationRequest::tool(
                "get_country_info",
                params(json!({ "country_name_in_french": "pays-test" })),
            ))
            .await
            .unwrap();

        assert_eq!(result.texts(), vec![NO_INFORMATION_FOUND]);
    }

    #[tokio::test]
    async fn test_country_info_malformed_html_is_successful_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pays-test")
            .with_status(200)
            .with_body("<html><body><div id=")
            .create_async()
            .await;

        let dispatcher = Dispatcher::from_config(&test_config(&server.url())).unwrap();
        let result = dispatcher
            .invoke(InvocationRequest::tool(
                "get_country_info",
                params(json!({ "country_name_in_french": "pays-test" })),
            ))
            .await
            .unwrap();

        assert_eq!(result.texts(), vec![NO_INFORMATION_FOUND]);
    }

    #[tokio::test]
    async fn test_resource_read_uses_uri_binding() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/japon")
            .with_status(200)
            .with_body(r#"<div id="securite"><p>Vigilance renforcée</p></div>"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::from_config(&test_config(&server.url())).unwrap();
        let uri = "advisory://country/Japon";
        let result = dispatcher
            .invoke(InvocationRequest::resource(uri))
            .await
            .unwrap();

        let read = result.into_read_resource_result(uri);
        assert_eq!(read.contents.len(), 1);
        match &read.contents[0] {
            ResourceContents::TextResourceContents { uri: addressed, text, .. } => {
                assert_eq!(addressed, uri);
                assert_eq!(text, "Vigilance renforcée");
            }
            other => panic!("expected text contents, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .invoke(InvocationRequest::resource("advisory://city/paris"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProtocolErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_timeout() {
        let dispatcher = dispatcher();
        let deadline = Duration::from_millis(30);

        // First ping is short (1ms), second is long (60ms)
        let first = dispatcher
            .invoke_with_deadline(InvocationRequest::tool("ping", JsonObject::new()), deadline)
            .await;
        assert!(first.is_ok());

        let second = dispatcher
            .invoke_with_deadline(InvocationRequest::tool("ping", JsonObject::new()), deadline)
            .await
            .unwrap_err();
        assert_eq!(second.kind, ProtocolErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_handler_error_is_handler_failure() {
        let err = run_handler("get_time", async {
            Err(ToolError::clock_unavailable("clock before epoch"))
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind, ProtocolErrorKind::HandlerFailure);
        assert!(err.message.contains("clock before epoch"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_handler_failure() {
        let err = run_handler("broken", async {
            if true {
                panic!("index out of bounds");
            }
            Ok(Vec::new())
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind, ProtocolErrorKind::HandlerFailure);
        assert!(err.message.contains("index out of bounds"));
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::not_found("Unknown tool: nope");
        assert_eq!(err.to_string(), "not found: Unknown tool: nope");
    }
}
