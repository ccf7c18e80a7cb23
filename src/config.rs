use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SNAP_RADIUS: f32 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum pointer distance (device pixels) at which a port is snapped to
    pub snap_radius: f32,
    /// Scale applied to raw pointer coordinates before they reach the editor
    pub device_pixel_ratio: f32,
    /// Place a start and an end terminal on an empty canvas
    pub seed_terminals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snap_radius: DEFAULT_SNAP_RADIUS,
            device_pixel_ratio: 1.0,
            seed_terminals: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("Failed to access config file {path}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Malformed config file {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        let io_err = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, contents).map_err(io_err)
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config: Config = serde_json::from_str(contents)?;
        // A zero or negative ratio would collapse every pointer event onto the origin
        if !(config.device_pixel_ratio > 0.0) {
            config.device_pixel_ratio = 1.0;
        }
        if config.snap_radius < 0.0 {
            config.snap_radius = DEFAULT_SNAP_RADIUS;
        }
        Ok(config)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "gator").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
