//! MCP server exposing surf forecasts: beach search, marine forecast lookup
//! and offshore/onshore and surfability classification.

pub mod analyzer;
pub mod conditions;
pub mod config;
pub mod constants;
pub mod error;
pub mod forecast;
pub mod formatters;
pub mod geocoding;
pub mod models;
pub mod service;

pub use conditions::{BeachMatchStrategy, SurfConditions};
pub use config::Config;
pub use error::SurfError;
pub use service::SurfService;
