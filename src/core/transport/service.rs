//! Runs the selected transport.
//!
//! Every transport is handed the same `McpServer`, hence one catalog and one
//! dispatcher whatever the clients connect through.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Owns the transport choice until the server is started.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Serve until the transport shuts down (stdin closed) or fails.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!(
            "Serving {} v{} over {}",
            server.name(),
            server.version(),
            self.config
        );

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "tcp")]
            TransportConfig::Tcp(tcp) => TcpTransport::new(tcp).run(server).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(http) => HttpTransport::new(http).run(server).await,
        }
    }
}
