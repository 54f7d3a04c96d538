//! Transport selection and per-transport settings.
//!
//! `MCP_TRANSPORT` picks the transport (`stdio`, `tcp` or `http`); the
//! remaining `MCP_TCP_*` / `MCP_HTTP_*` variables tune the chosen one.
//! Malformed values are logged and replaced by their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(any(feature = "tcp", feature = "http"))]
use crate::core::config::env_parse;

#[cfg(feature = "http")]
use crate::core::config::env_flag;

#[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");

/// The transport the server listens on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// One client over stdin/stdout.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Line-delimited JSON-RPC, one task per connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// JSON-RPC over HTTP POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Route of the JSON-RPC endpoint, always starting with `/`.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Answer browser preflight requests.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        return Self::Stdio;

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        return Self::Tcp(TcpConfig::default());

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        return Self::Http(HttpConfig::default());
    }
}

impl TransportConfig {
    /// Select the transport from `MCP_TRANSPORT`.
    ///
    /// Unset or blank means the default transport. A name that is unknown,
    /// or whose feature is not compiled in, is logged and also falls back to
    /// the default.
    pub fn from_env() -> Self {
        let raw = std::env::var("MCP_TRANSPORT").unwrap_or_default();
        let name = raw.trim().to_lowercase();

        if name.is_empty() {
            return Self::default();
        }

        Self::named(&name).unwrap_or_else(|| {
            let fallback = Self::default();
            warn!(
                "Unknown or disabled transport {:?}, falling back to {}",
                raw, fallback
            );
            fallback
        })
    }

    fn named(name: &str) -> Option<Self> {
        match name {
            #[cfg(feature = "stdio")]
            "stdio" => Some(Self::Stdio),
            #[cfg(feature = "tcp")]
            "tcp" => Some(Self::Tcp(TcpConfig::from_env())),
            #[cfg(feature = "http")]
            "http" => Some(Self::Http(HttpConfig::from_env())),
            _ => None,
        }
    }
}

impl fmt::Display for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => write!(f, "STDIO"),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => write!(f, "TCP on {}:{}", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => write!(f, "HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_host(),
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    /// Defaults overridden by `MCP_TCP_PORT` and `MCP_TCP_HOST`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_parse("MCP_TCP_PORT") {
            config.port = port;
        }

        if let Ok(host) = std::env::var("MCP_TCP_HOST") {
            config.host = host;
        }

        config
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Defaults overridden by `MCP_HTTP_PORT`, `MCP_HTTP_HOST`,
    /// `MCP_HTTP_PATH` and `MCP_HTTP_CORS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_parse("MCP_HTTP_PORT") {
            config.port = port;
        }

        if let Ok(host) = std::env::var("MCP_HTTP_HOST") {
            config.host = host;
        }

        if let Ok(path) = std::env::var("MCP_HTTP_PATH") {
            let path = path.trim();
            if path.starts_with('/') {
                config.rpc_path = path.to_string();
            } else {
                warn!("MCP_HTTP_PATH must start with '/', got {:?}; prefixing it", path);
                config.rpc_path = format!("/{}", path);
            }
        }

        if let Some(enable_cors) = env_flag("MCP_HTTP_CORS") {
            config.enable_cors = enable_cors;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{capture_logs, env_lock};

    const TRANSPORT_VARS: [&str; 7] = [
        "MCP_TRANSPORT",
        "MCP_TCP_PORT",
        "MCP_TCP_HOST",
        "MCP_HTTP_PORT",
        "MCP_HTTP_HOST",
        "MCP_HTTP_PATH",
        "MCP_HTTP_CORS",
    ];

    /// Run `f` with exactly the given transport variables set.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _lock = env_lock();
        unsafe {
            for key in TRANSPORT_VARS {
                std::env::remove_var(key);
            }
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
        }
        let result = f();
        unsafe {
            for key in TRANSPORT_VARS {
                std::env::remove_var(key);
            }
        }
        result
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_unset_transport_is_stdio() {
        let config = with_env(&[], TransportConfig::from_env);
        assert_eq!(config, TransportConfig::Stdio);
        assert_eq!(config.to_string(), "STDIO");

        let config = with_env(&[("MCP_TRANSPORT", "  ")], TransportConfig::from_env);
        assert_eq!(config, TransportConfig::Stdio);
    }

    #[test]
    fn test_unknown_transport_falls_back_with_warning() {
        let (config, logs) = with_env(&[("MCP_TRANSPORT", "carrier-pigeon")], || {
            capture_logs(TransportConfig::from_env)
        });

        assert_eq!(config, TransportConfig::default());
        assert!(
            logs.contains("Unknown or disabled transport \"carrier-pigeon\""),
            "{}",
            logs
        );
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn test_tcp_from_env() {
        let config = with_env(
            &[
                ("MCP_TRANSPORT", "TCP"),
                ("MCP_TCP_PORT", "4100"),
                ("MCP_TCP_HOST", "0.0.0.0"),
            ],
            TransportConfig::from_env,
        );

        assert_eq!(
            config,
            TransportConfig::Tcp(TcpConfig {
                port: 4100,
                host: "0.0.0.0".to_string(),
            })
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_bad_port_keeps_default_and_warns() {
        let (config, logs) = with_env(
            &[
                ("MCP_TRANSPORT", "http"),
                ("MCP_HTTP_PORT", "eighty"),
                ("MCP_HTTP_PATH", "rpc"),
                ("MCP_HTTP_CORS", "no"),
            ],
            || capture_logs(TransportConfig::from_env),
        );

        let TransportConfig::Http(http) = config else {
            panic!("expected HTTP transport, got {:?}", config);
        };
        assert_eq!(http.port, 8080);
        assert_eq!(http.rpc_path, "/rpc");
        assert!(!http.enable_cors);
        assert!(logs.contains("Ignoring invalid value for MCP_HTTP_PORT"), "{}", logs);
        assert!(logs.contains("MCP_HTTP_PATH must start with '/'"), "{}", logs);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.rpc_path, "/mcp");
        assert!(config.enable_cors);
        assert_eq!(
            TransportConfig::Http(config).to_string(),
            "HTTP on 127.0.0.1:8080/mcp"
        );
    }
}
