//! Application configuration module.
//!
//! Manages the TOML config file holding upstream and search settings.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, resolve_config_path};
