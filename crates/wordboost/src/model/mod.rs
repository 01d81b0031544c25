//! High-level model API.
//!
//! - [`Booster`]: train from samples or records, then score feature vectors
//! - [`BoostConfig`]: validated configuration built with `bon`

mod booster;
mod config;

pub use booster::Booster;
pub use config::{BoostConfig, BoostConfigBuilder, ConfigError};
