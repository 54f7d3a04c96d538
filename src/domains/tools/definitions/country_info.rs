//! Country info tool definition.
//!
//! Fetches the 'sécurité' section of the French Ministry of Foreign Affairs
//! travel advice page for a country. When the page or the section cannot be
//! obtained the tool still succeeds, with a fixed "no information" text.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::advisory::AdvisoryClient;
use crate::domains::tools::ToolError;

/// Parameters for the country info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CountryInfoParams {
    /// Country name in French, as used in the travel advice page URL.
    #[schemars(
        description = "Name of the country in French, as used in the France Diplomatie URL (e.g. \"japon\", \"senegal\")"
    )]
    pub country_name_in_french: String,
}

/// Country info tool - travel security advice for a country.
pub struct CountryInfoTool;

impl CountryInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_country_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetches the 'sécurité' section from the French Ministry of Foreign Affairs travel advice page for a given country. Returns the section text, or a message saying no information was found.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(country = %params.country_name_in_french))]
    pub async fn execute(
        params: CountryInfoParams,
        client: &AdvisoryClient,
    ) -> Result<Vec<Content>, ToolError> {
        let text = client
            .lookup(&params.country_name_in_french)
            .await
            .into_text();
        Ok(vec![Content::text(text)])
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CountryInfoParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Travel security advice".into()),
        }
    }
}
