//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` next to `parables.json` in the
//! content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Parables"                 # <title> and page heading
//! footer_url = "https://github.com/cameron-yee"  # empty = no footer link
//!
//! [verse_service]
//! base_url = "https://bible-api.com" # GET <base_url>/<reference>
//! timeout_secs = 30                  # 0 = no explicit timeout
//!
//! [processing]
//! max_processes = 4                  # Max parallel page builds (omit for auto)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::verse::DEFAULT_BASE_URL;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot encode stock settings: {0}")]
    Defaults(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity (title, footer link).
    pub site: SiteInfo,
    /// Where passage text is fetched from.
    pub verse_service: VerseServiceConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        let url = &self.verse_service.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "verse_service.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site title, used for the listing heading and as the page title prefix.
    pub title: String,
    /// Profile link shown in the page footer. Empty disables the footer link.
    pub footer_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Parables".to_string(),
            footer_url: "https://github.com/cameron-yee".to_string(),
        }
    }
}

impl SiteInfo {
    pub fn footer_link(&self) -> Option<&str> {
        let url = self.footer_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

/// Verse service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerseServiceConfig {
    /// Service root; references are appended as a path segment.
    pub base_url: String,
    /// Request timeout in seconds. 0 leaves the HTTP client default.
    pub timeout_secs: u64,
}

impl Default for VerseServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl VerseServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of detail pages built concurrently.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Worker count for the page pool: every core unless `max_processes` asks
/// for fewer. Never zero, never more than the machine has.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Loading
// =============================================================================

/// Optional config file in the content root, next to the catalog.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Built-in settings as a TOML table, the layer a user file is laid over.
pub fn stock_defaults() -> Result<toml::Table, ConfigError> {
    let value = toml::Value::try_from(SiteConfig::default())?;
    Ok(match value {
        toml::Value::Table(table) => table,
        _ => toml::Table::new(),
    })
}

/// Lay `overlay` over `base` in place.
///
/// A section present in both is combined key by key, so a file that sets only
/// `verse_service.base_url` keeps the stock `timeout_secs`. Any other value in
/// the overlay replaces what `base` had.
pub fn merge_toml(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut section)), toml::Value::Table(over)) => {
                merge_toml(&mut section, over);
                toml::Value::Table(section)
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
}

/// Read the user's config file from `root`, if there is one.
pub fn read_config_file(root: &Path) -> Result<Option<toml::Table>, ConfigError> {
    match fs::read_to_string(root.join(CONFIG_FILENAME)) {
        Ok(content) => Ok(Some(toml::from_str(&content)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Stock settings with the optional user table laid over them, checked.
pub fn resolve_config(user: Option<toml::Table>) -> Result<SiteConfig, ConfigError> {
    let mut table = stock_defaults()?;
    if let Some(user) = user {
        merge_toml(&mut table, user);
    }
    let config: SiteConfig = toml::Value::Table(table).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config for a content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(read_config_file(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Parable Site Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to parables.json in the content root.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Listing page heading; detail pages are titled "<title> | <parable>".
title = "Parables"

# Link shown in the footer of every page. Set to "" to drop the footer link.
footer_url = "https://github.com/cameron-yee"

# ---------------------------------------------------------------------------
# Verse service
# ---------------------------------------------------------------------------
[verse_service]
# Passages are fetched with GET <base_url>/<reference>, e.g.
#   https://bible-api.com/luke+15:4-7
#   https://bible-api.com/matthew%2013:31
base_url = "https://bible-api.com"

# Request timeout in seconds. 0 keeps the HTTP client default.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum detail pages built (and fetched) concurrently.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
