//! Settings file handling for cwhisper
//!
//! Settings are stored at `~/.config/cwhisper/config.yaml` (or the platform
//! equivalent via `dirs::config_dir()`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::telemetry::IdeIdentity;

/// Settings filename within the cwhisper config directory
const FILENAME: &str = "config.yaml";

/// Application directory name
const APP_DIR: &str = "cwhisper";

/// IDE category reported when the settings file does not name one
pub const DEFAULT_IDE_CATEGORY: &str = "CLI";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("settings not found, run `cwhisper config init` to get started")]
    NotFound,

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// User-level cwhisper settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Opt out of sharing content with the service for improvement
    #[serde(default)]
    pub opt_out: bool,

    /// Whether usage telemetry may be sent
    #[serde(default = "default_true")]
    pub telemetry_enabled: bool,

    /// Service region override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Service endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Stable anonymous client identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// IDE category reported in telemetry
    #[serde(default = "default_ide_category")]
    pub ide_category: String,

    /// IDE version reported in telemetry (defaults to the cwhisper version)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ide_version: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_ide_category() -> String {
    DEFAULT_IDE_CATEGORY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opt_out: false,
            telemetry_enabled: true,
            region: None,
            endpoint: None,
            client_id: None,
            ide_category: default_ide_category(),
            ide_version: None,
        }
    }
}

impl Settings {
    /// Return the path to the settings file: `<config_dir>/cwhisper/config.yaml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the settings from the standard location.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load the settings, falling back to defaults when no file exists yet.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::load() {
            Err(ConfigError::NotFound) => Ok(Self::default()),
            other => other,
        }
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                ConfigError::Read(e)
            }
        })?;
        let settings: Settings = serde_yaml::from_str(&contents)?;
        Ok(settings)
    }

    /// Save the settings to the standard location, creating the directory if needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Return the client id, generating one if none is stored yet.
    ///
    /// Returns `true` alongside the id when a new one was generated and the
    /// settings need saving.
    pub fn ensure_client_id(&mut self) -> (String, bool) {
        match self.client_id {
            Some(ref id) => (id.clone(), false),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                self.client_id = Some(id.clone());
                (id, true)
            }
        }
    }

    /// IDE identity reported alongside telemetry.
    pub fn ide(&self) -> IdeIdentity {
        IdeIdentity {
            category: self.ide_category.clone(),
            version: self
                .ide_version
                .clone()
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}
