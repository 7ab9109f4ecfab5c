//! Configuration module for the relay
//!
//! This module provides configuration types, TOML parsing for the optional
//! configuration file, and merging with command line / environment values.

mod relay;

pub use relay::{
    ConfigOverrides, FileConfig, RelayConfig, RelaySection, DEFAULT_LISTEN_PORT, MAX_UDP_PAYLOAD,
};

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string
pub fn parse_config(content: &str) -> Result<FileConfig> {
    toml::from_str(content).with_context(|| "Failed to parse configuration")
}

/// Build the validated relay configuration
///
/// Reads `path` when given, then applies `overrides` on top of it.
pub fn resolve_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<RelayConfig> {
    let file = match path {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };

    let config = RelayConfig::from_parts(file.relay, overrides);
    config.validate()?;
    Ok(config)
}
