//! Travel advisory domain module.
//!
//! Fetches a country page from the French Ministry of Foreign Affairs travel
//! advice site and extracts its security section. Both the
//! `get_country_info` tool and the travel advisory resource are built on top
//! of [`AdvisoryClient::lookup`], which never fails: network and parsing
//! problems are logged and reported as [`SectionLookup::NotFound`].

mod client;
mod error;

pub use client::{AdvisoryClient, NO_INFORMATION_FOUND, SectionLookup, lookup_key};
pub use error::AdvisoryError;
