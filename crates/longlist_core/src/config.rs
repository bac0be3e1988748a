//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_CATALOG_SIZE, DEFAULT_ITEM_LABEL_PREFIX, DEFAULT_MAX_REQUEST_SIZE, DEFAULT_PORT,
};
use serde::Deserialize;
use std::env;

/// Runtime configuration for LongList.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub catalog_size: usize,
    pub item_label_prefix: String,
    pub max_request_size: usize,
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn parse_env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        Self {
            port: parse_env_number("PORT").unwrap_or(DEFAULT_PORT),
            catalog_size: parse_env_number("CATALOG_SIZE").unwrap_or(DEFAULT_CATALOG_SIZE),
            item_label_prefix: env::var("ITEM_LABEL_PREFIX")
                .ok()
                .filter(|prefix| !prefix.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ITEM_LABEL_PREFIX.to_string()),
            max_request_size: parse_env_number("MAX_REQUEST_SIZE")
                .unwrap_or(DEFAULT_MAX_REQUEST_SIZE),
        }
    }
}
