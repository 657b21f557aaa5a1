use crate::error::ChatError;
use crate::poll::PollSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shortest delay between two reply fetches.
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

/// User settings for the chat client, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub base_url: String,
    pub assistant_name: String,
    pub poll_interval_ms: u64,
    pub max_poll_interval_ms: u64,
    pub backoff: f64,
    pub typing_dots: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            assistant_name: "Assistant".to_string(),
            poll_interval_ms: 500,
            max_poll_interval_ms: 5000,
            backoff: 1.0,
            typing_dots: 4,
        }
    }
}

impl ChatConfig {
    /// `<config dir>/mathmark/chat.json`, if the platform has a config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mathmark").join("chat.json"))
    }

    /// Reads a config file. Missing keys take their defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ChatError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the user's config, or the defaults when there is none or it
    /// cannot be read.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load chat config from {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Poll timing, with out-of-range values pulled back to something the
    /// loop can use.
    pub fn poll_settings(&self) -> PollSettings {
        let interval_ms = self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS);
        let backoff = if self.backoff.is_finite() && self.backoff >= 1.0 {
            self.backoff
        } else {
            log::warn!("Ignoring invalid poll backoff {}, using 1.0", self.backoff);
            1.0
        };
        PollSettings {
            interval: Duration::from_millis(interval_ms),
            max_interval: Duration::from_millis(self.max_poll_interval_ms.max(interval_ms)),
            backoff,
        }
    }
}
