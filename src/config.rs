//! Library configuration.
//!
//! Loaded from an optional `dam.toml` in the repository root. Stock defaults
//! are the base layer and the user file is merged on top, so a config file
//! only needs the keys it wants to change:
//!
//! ```toml
//! assets_dir = "assets"           # Scanned tree, relative to the root
//! output = "data/manifest.json"   # Manifest path, relative to the root
//!
//! [exiftool]
//! binary = "exiftool"             # Name on PATH or absolute path
//!
//! [search]
//! limit = 6                       # Popular terms shown by `search`
//! ```
//!
//! Unknown keys are rejected to catch typos early. The resolved [`DamConfig`]
//! is handed to the builder and the commands explicitly; nothing here reads
//! the process environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the repository root.
pub const CONFIG_FILENAME: &str = "dam.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DamConfig {
    /// Directory scanned for assets, relative to the root. Manifest paths
    /// always start with `assets/` regardless of this value.
    pub assets_dir: String,
    /// Where the manifest is written, relative to the root.
    pub output: String,
    pub exiftool: ExifToolConfig,
    pub search: SearchConfig,
}

impl Default for DamConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            output: "data/manifest.json".to_string(),
            exiftool: ExifToolConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl DamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets_dir must not be empty".into(),
            ));
        }
        if self.output.trim().is_empty() {
            return Err(ConfigError::Validation("output must not be empty".into()));
        }
        if self.exiftool.binary.trim().is_empty() {
            return Err(ConfigError::Validation(
                "exiftool.binary must not be empty".into(),
            ));
        }
        if self.search.limit == 0 {
            return Err(ConfigError::Validation(
                "search.limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn assets_path(&self, root: &Path) -> PathBuf {
        root.join(&self.assets_dir)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExifToolConfig {
    pub binary: String,
}

impl Default for ExifToolConfig {
    fn default() -> Self {
        Self {
            binary: "exiftool".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Number of popular terms returned when no limit is given.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 6 }
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// The stock defaults as a TOML table, used as the base layer for merging.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DamConfig::default()).expect("default config must serialize")
}

/// Lay `user` over `defaults`. Sections such as `[exiftool]` merge key by
/// key, so `[search] limit = 3` keeps the stock `[exiftool] binary`.
pub fn merge_toml(defaults: toml::Value, user: toml::Value) -> toml::Value {
    use toml::Value::Table;

    match (defaults, user) {
        (Table(mut section), Table(user_section)) => {
            for (key, value) in user_section {
                let value = match section.remove(&key) {
                    Some(default) => merge_toml(default, value),
                    None => value,
                };
                section.insert(key, value);
            }
            Table(section)
        }
        (_, user) => user,
    }
}

/// Parse `<root>/dam.toml`. A repository without one yields `Ok(None)`.
pub fn read_config_file(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(path = %path.display(), "read config file");
    Ok(Some(toml::from_str(&content)?))
}

/// Stock defaults with the user's `dam.toml` values (if any) on top.
pub fn config_from_overrides(user: Option<toml::Value>) -> Result<DamConfig, ConfigError> {
    let layered = match user {
        Some(user) => merge_toml(stock_defaults_value(), user),
        None => stock_defaults_value(),
    };
    let config: DamConfig = layered.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration for the repository at `root`.
pub fn load_config(root: &Path) -> Result<DamConfig, ConfigError> {
    config_from_overrides(read_config_file(root)?)
}

/// A fully commented stock `dam.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# static-dam configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Directory scanned for images and videos, relative to the repository root.
assets_dir = "assets"

# Where the manifest is written, relative to the repository root.
# The directory is created if missing; an existing file is replaced.
output = "data/manifest.json"

# ---------------------------------------------------------------------------
# Metadata extraction
# ---------------------------------------------------------------------------
[exiftool]
# Invoked once per file as: <binary> -json -G1 -n <file>
binary = "exiftool"

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Number of popular search terms listed when no --limit is given.
limit = 6
"##
}
