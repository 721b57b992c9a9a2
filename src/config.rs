//! Configuration persistence for the flashdeck CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::storage::DeckStore;

/// Settings that persist between sessions.
///
/// The file is optional and read-only from the CLI's point of view; edit
/// `config.toml` by hand to change it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the deck files. `None` means the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decks_dir: Option<PathBuf>,
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flashdeck")
            .join("config.toml")
    }

    /// Load config from disk, returning default if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// The decks directory to use: the configured override, else the
    /// platform default.
    pub fn resolved_decks_dir(&self) -> PathBuf {
        self.decks_dir
            .clone()
            .unwrap_or_else(DeckStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.decks_dir.is_none());
        assert_eq!(config.resolved_decks_dir(), DeckStore::default_path());
    }

    #[test]
    fn test_configured_decks_dir_wins() {
        let config: Config = toml::from_str(r#"decks_dir = "/tmp/my-decks""#).unwrap();
        assert_eq!(config.resolved_decks_dir(), PathBuf::from("/tmp/my-decks"));
    }
}
