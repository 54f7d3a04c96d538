//! France Diplomatie travel advice client.
//!
//! A lookup goes through `Fetching -> Parsing -> {Found, NotFound}`. Errors on
//! the way (transport failure, non-success status) are logged and end the
//! lookup as `NotFound`: an unreliable third-party site may degrade an answer
//! but never fail an invocation.

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use super::error::AdvisoryError;
use crate::core::config::AdvisoryConfig;

/// Text returned when no security section could be obtained.
pub const NO_INFORMATION_FOUND: &str = "No security information found for this country.";

/// Outcome of an advisory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionLookup {
    /// The section text, one trimmed text node per line.
    Found(String),

    /// No section: missing page, missing anchor, or an unreachable site.
    NotFound,
}

impl SectionLookup {
    /// Text to hand back to the caller.
    pub fn into_text(self) -> String {
        match self {
            Self::Found(text) => text,
            Self::NotFound => NO_INFORMATION_FOUND.to_string(),
        }
    }
}

/// Canonical lookup key: the trimmed, lower-cased country name.
pub fn lookup_key(country: &str) -> String {
    country.trim().to_lowercase()
}

/// HTTP client for the travel advice pages.
#[derive(Debug, Clone)]
pub struct AdvisoryClient {
    http: reqwest::Client,
    base_url: String,
    section_id: String,
    selector: Selector,
}

impl AdvisoryClient {
    /// Build a client from configuration.
    ///
    /// Fails only on an unusable configuration (TLS backend, section id).
    pub fn new(config: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisoryError::Client(e.to_string()))?;

        let selector = Selector::parse(&format!(r#"div[id="{}"]"#, config.section_id))
            .map_err(|e| AdvisoryError::Selector(e.to_string()))?;

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http,
            base_url,
            section_id: config.section_id.clone(),
            selector,
        })
    }

    /// URL of the advice page for `country`.
    ///
    /// The key is percent-encoded as a single path segment, so `/`, `?` and
    /// `#` cannot leave the country page. Keys that would resolve to the base
    /// or its parent (empty, `.`, `..`) have no page.
    pub fn url_for(&self, country: &str) -> Option<String> {
        let key = lookup_key(country);
        if key.chars().all(|c| c == '.') {
            return None;
        }
        Some(format!("{}{}", self.base_url, urlencoding::encode(&key)))
    }

    /// Fetch the page for `country` and extract its security section.
    #[instrument(skip(self))]
    pub async fn lookup(&self, country: &str) -> SectionLookup {
        let Some(url) = self.url_for(country) else {
            warn!("No advice page for country name {:?}", country);
            return SectionLookup::NotFound;
        };
        info!("Fetching travel advice from {}", url);

        match self.fetch_section(&url).await {
            Ok(Some(text)) => {
                debug!("Found '{}' section ({} bytes)", self.section_id, text.len());
                SectionLookup::Found(text)
            }
            Ok(None) => {
                warn!("Section '{}' not found at {}", self.section_id, url);
                SectionLookup::NotFound
            }
            Err(e) => {
                warn!("Travel advice lookup failed for {}: {}", url, e);
                SectionLookup::NotFound
            }
        }
    }

    async fn fetch_section(&self, url: &str) -> Result<Option<String>, AdvisoryError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Status(status));
        }

        let body = response.text().await?;
        Ok(self.extract_section(&body))
    }

    /// Extract the section text from an HTML document.
    ///
    /// Text nodes are trimmed, empty ones dropped, and the rest joined with
    /// newlines. A section without text counts as missing.
    pub fn extract_section(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let section = document.select(&self.selector).next()?;

        let text = section
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        (!text.is_empty()).then_some(text)
    }
}
