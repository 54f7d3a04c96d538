//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod country_info;
pub mod echo;
pub mod get_time;
pub mod ping;

pub use country_info::{CountryInfoParams, CountryInfoTool};
pub use echo::{EchoParams, EchoTool};
pub use get_time::{GetTimeParams, GetTimeTool};
pub use ping::{Latency, PingParams, PingState, PingTool};
