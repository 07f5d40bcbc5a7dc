//! Bot settings loading from config.toml
//!
//! Every section is optional: a missing file, or a file that leaves out a
//! section or key, falls back to the defaults below. Secrets (the bot token
//! and the image host client id) come from the environment instead.

use crate::{
    core::packer::PackerLimits,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Answer embed size limits
    pub packer: PackerLimits,
    /// Voting rules
    pub voting: VotingSettings,
    /// Image albums for the macro commands
    pub albums: AlbumSettings,
}

/// Voting rules
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VotingSettings {
    /// Maximum number of nominees per ballot
    pub max_votes: usize,
}

impl Default for VotingSettings {
    fn default() -> Self {
        Self { max_votes: 3 }
    }
}

/// Album ids on the image host
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AlbumSettings {
    /// Albums `/bidoof` draws from
    pub bidoof: Vec<String>,
    /// Albums `/sadcat` draws from
    pub sadcat: Vec<String>,
}

impl Default for AlbumSettings {
    fn default() -> Self {
        Self {
            bidoof: vec!["kn6ieEv".to_string()],
            sadcat: vec!["tYiOD5a".to_string(), "kSwj6F5".to_string()],
        }
    }
}

/// Loads settings from a TOML file, using defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads settings from `CONFIG_PATH`, or ./config.toml when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}

/// Image host client id from `IMGUR_CLIENT_ID`; image commands are disabled without it.
#[must_use]
pub fn imgur_client_id() -> Option<String> {
    std::env::var("IMGUR_CLIENT_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
}
