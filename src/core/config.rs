//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Latency settings of the `ping` tool.
    pub ping: PingConfig,

    /// Outbound travel advisory lookup settings.
    pub advisory: AdvisoryConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Deadline applied to every tool call and resource read, in
    /// milliseconds. `None` lets invocations run to completion.
    #[serde(default)]
    pub call_timeout_ms: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Delays used by the `ping` tool.
///
/// Successive pings alternate between the short and the long delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingConfig {
    /// Delay of the fast path, in milliseconds.
    pub short_ms: u64,

    /// Delay of the slow path, in milliseconds.
    pub long_ms: u64,
}

/// Settings for the France Diplomatie travel advice lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Base URL; the lower-cased country name is appended to it.
    pub base_url: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// `id` of the `<div>` holding the security section.
    pub section_id: String,

    /// Request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read the logging settings alone.
    ///
    /// The binary calls this before installing its subscriber, so that the
    /// rest of [`Config::from_env`] runs with logging already in place.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Some(with_timestamps) = env_flag("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = with_timestamps;
        }

        logging
    }
}

impl ServerConfig {
    /// Deadline for a single invocation, if one is configured.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

impl PingConfig {
    pub fn short_delay(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }

    pub fn long_delay(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            short_ms: 100,
            long_ms: 5_000,
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.diplomatie.gouv.fr/fr/conseils-aux-voyageurs/conseils-par-pays-destination/"
                .to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            section_id: "securite".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "travel-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                call_timeout_ms: None,
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            ping: PingConfig::default(),
            advisory: AdvisoryConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_PING_LONG_MS`.
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(timeout_ms) = env_parse("MCP_CALL_TIMEOUT_MS") {
            config.server.call_timeout_ms = Some(timeout_ms);
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Some(short_ms) = env_parse("MCP_PING_SHORT_MS") {
            config.ping.short_ms = short_ms;
        }

        if let Some(long_ms) = env_parse("MCP_PING_LONG_MS") {
            config.ping.long_ms = long_ms;
        }

        if let Ok(base_url) = std::env::var("MCP_ADVISORY_BASE_URL") {
            info!("Travel advisory base URL overridden: {}", base_url);
            config.advisory.base_url = base_url;
        }

        if let Ok(user_agent) = std::env::var("MCP_ADVISORY_USER_AGENT") {
            config.advisory.user_agent = user_agent;
        }

        if let Ok(section_id) = std::env::var("MCP_ADVISORY_SECTION_ID") {
            config.advisory.section_id = section_id;
        }

        if let Some(timeout_secs) = env_parse("MCP_ADVISORY_TIMEOUT_SECS") {
            config.advisory.timeout_secs = timeout_secs;
        }

        config
    }

    /// Check the values that cannot be caught by the type system.
    pub fn validate(&self) -> Result<()> {
        if self.ping.short_ms > self.ping.long_ms {
            return Err(Error::config(format!(
                "ping short delay ({}ms) exceeds long delay ({}ms)",
                self.ping.short_ms, self.ping.long_ms
            )));
        }

        let base_url = &self.advisory.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "advisory base URL must be http(s): {}",
                base_url
            )));
        }

        if self.server.call_timeout_ms == Some(0) {
            return Err(Error::config("call timeout must be positive when set"));
        }

        if self.advisory.timeout_secs == 0 {
            return Err(Error::config("advisory timeout must be at least one second"));
        }

        if self.advisory.section_id.trim().is_empty() {
            return Err(Error::config("advisory section id must not be empty"));
        }

        Ok(())
    }
}

/// Read and parse an environment variable, warning on malformed values.
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

/// Read a boolean environment variable (`true/false`, `1/0`, `yes/no`, `on/off`).
pub(crate) fn env_flag(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{capture_logs, env_lock};

    #[test]
    fn test_ping_delays_from_env() {
        let _lock = env_lock();
        unsafe {
            std::env::set_var("MCP_PING_SHORT_MS", "20");
            std::env::set_var("MCP_PING_LONG_MS", "750");
        }
        let config = Config::from_env();
        assert_eq!(config.ping.short_delay(), Duration::from_millis(20));
        assert_eq!(config.ping.long_delay(), Duration::from_millis(750));
        unsafe {
            std::env::remove_var("MCP_PING_SHORT_MS");
            std::env::remove_var("MCP_PING_LONG_MS");
        }
    }

    #[test]
    fn test_invalid_number_keeps_default() {
        let _lock = env_lock();
        unsafe {
            std::env::set_var("MCP_ADVISORY_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.advisory.timeout_secs, 10);
        unsafe {
            std::env::remove_var("MCP_ADVISORY_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_advisory_overrides_from_env() {
        let _lock = env_lock();
        unsafe {
            std::env::set_var("MCP_ADVISORY_BASE_URL", "http://localhost:9999/pays/");
            std::env::set_var("MCP_ADVISORY_SECTION_ID", "security");
        }
        let config = Config::from_env();
        assert_eq!(config.advisory.base_url, "http://localhost:9999/pays/");
        assert_eq!(config.advisory.section_id, "security");
        assert_eq!(config.advisory.user_agent, "Mozilla/5.0");
        unsafe {
            std::env::remove_var("MCP_ADVISORY_BASE_URL");
            std::env::remove_var("MCP_ADVISORY_SECTION_ID");
        }
    }

    #[test]
    fn test_call_timeout_from_env() {
        let _lock = env_lock();
        unsafe {
            std::env::set_var("MCP_CALL_TIMEOUT_MS", "2500");
        }
        let config = Config::from_env();
        assert_eq!(
            config.server.call_timeout(),
            Some(Duration::from_millis(2500))
        );
        unsafe {
            std::env::remove_var("MCP_CALL_TIMEOUT_MS");
        }
        assert_eq!(Config::from_env().server.call_timeout(), None);
    }

    #[test]
    fn test_invalid_values_are_logged() {
        let _lock = env_lock();
        unsafe {
            std::env::set_var("MCP_PING_SHORT_MS", "abc");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "sometimes");
            std::env::set_var("MCP_ADVISORY_BASE_URL", "http://x/");
        }
        let (config, logs) = capture_logs(Config::from_env);
        unsafe {
            std::env::remove_var("MCP_PING_SHORT_MS");
            std::env::remove_var("MCP_LOG_TIMESTAMPS");
            std::env::remove_var("MCP_ADVISORY_BASE_URL");
        }

        assert_eq!(config.ping.short_ms, 100);
        assert!(config.logging.with_timestamps);
        assert!(logs.contains("Ignoring invalid value for MCP_PING_SHORT_MS"), "{}", logs);
        assert!(logs.contains("Ignoring invalid value for MCP_LOG_TIMESTAMPS"), "{}", logs);
        assert!(logs.contains("Travel advisory base URL overridden"), "{}", logs);
    }

    #[test]
    fn test_logging_config_from_env() {
        let _lock = env_lock();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "off");
        }
        let logging = LoggingConfig::from_env();
        unsafe {
            std::env::remove_var("MCP_LOG_LEVEL");
            std::env::remove_var("MCP_LOG_TIMESTAMPS");
        }

        assert_eq!(logging.level, "debug");
        assert!(!logging.with_timestamps);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_ping_delays() {
        let mut config = Config::default();
        config.ping = PingConfig {
            short_ms: 500,
            long_ms: 10,
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.advisory.base_url = "ftp://example.org/".to_string();
        assert!(config.validate().is_err());
    }
}
