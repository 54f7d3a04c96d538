//! Travel advisory resource definition.
//!
//! `advisory://country/{country}` serves the same security section as the
//! `get_country_info` tool, addressed by URI.

use rmcp::model::Content;
use serde::Deserialize;
use tracing::{info, instrument};

use super::ResourceDefinition;
use crate::domains::advisory::AdvisoryClient;

/// Parameters bound from the URI template.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelAdvisoryParams {
    /// Country name in French, as it appears in the URI.
    pub country: String,
}

/// Travel advisory by country (dynamic).
pub struct TravelAdvisoryResource;

impl ResourceDefinition for TravelAdvisoryResource {
    const URI_TEMPLATE: &'static str = "advisory://country/{country}";
    const NAME: &'static str = "travel_advisory";
    const TITLE: &'static str = "Travel advisory by country";
    const DESCRIPTION: &'static str = "Security section of the French Ministry of Foreign Affairs travel advice for a country (country name in French, e.g. advisory://country/japon)";
    const MIME_TYPE: &'static str = "text/plain";
}

impl TravelAdvisoryResource {
    /// Read the advisory. Lookup failures yield the fallback text.
    #[instrument(skip_all, fields(country = %params.country))]
    pub async fn read(params: TravelAdvisoryParams, client: &AdvisoryClient) -> Vec<Content> {
        info!("Reading travel advisory resource");
        let text = client.lookup(&params.country).await.into_text();
        vec![Content::text(text)]
    }
}
