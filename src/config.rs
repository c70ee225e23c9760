//! Client configuration from homily.toml

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "homily.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the sermon service, e.g. "http://localhost:3000"
    pub base_url: String,
    /// The user whose sermons and tags are loaded
    pub user_id: String,
    /// Default: see thought_debounce_ms below
    #[serde(default = "default_thought_debounce_ms")]
    pub thought_debounce_ms: u64,
    #[serde(default = "default_structure_debounce_ms")]
    pub structure_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_thought_debounce_ms() -> u64 {
    500
}

fn default_structure_debounce_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<ClientConfig> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: ClientConfig =
            toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))?;
        if config.base_url.is_empty() {
            return Err(Error::Config("base_url must not be empty".into()));
        }
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn thought_window(&self) -> Duration {
        Duration::from_millis(self.thought_debounce_ms)
    }

    pub fn structure_window(&self) -> Duration {
        Duration::from_millis(self.structure_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_config_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homily.toml");
        std::fs::write(&path, "base_url = \"http://localhost:3000\"\nuser_id = \"u1\"\n")
            .unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.thought_debounce_ms, 500);
        assert_eq!(config.structure_debounce_ms, 1000);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn round_trips_through_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homily.toml");
        let config = ClientConfig {
            base_url: "https://sermons.example".into(),
            user_id: "u1".into(),
            thought_debounce_ms: 250,
            structure_debounce_ms: 900,
            request_timeout_secs: 10,
        };
        config.save(&path).unwrap();
        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.base_url, config.base_url);
        assert_eq!(loaded.thought_debounce_ms, 250);
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homily.toml");
        std::fs::write(&path, "base_url = \"\"\nuser_id = \"u1\"\n").unwrap();
        assert!(ClientConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        match ClientConfig::load("/nonexistent/homily.toml") {
            Err(Error::Config(msg)) => assert!(msg.contains("cannot read")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
