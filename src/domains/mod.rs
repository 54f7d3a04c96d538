//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server:
//!
//! - **tools**: callable capabilities (`ping`, `get_time`, `get_country_info`, `echo`)
//! - **resources**: URI-addressable data views (travel advisory by country)
//! - **advisory**: the France Diplomatie fetcher both of the above rely on

pub mod advisory;
pub mod resources;
pub mod tools;
