//! Game configuration
//!
//! Settings load from an optional TOML file next to the executable;
//! anything absent falls back to the built-in defaults. A file that
//! exists but fails to parse is a fatal startup error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The config file could not be parsed as TOML
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}

/// Top-level game configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Audio asset paths and volume
    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

/// Window settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial window width in pixels
    pub width: u32,
    /// Initial window height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Star Catcher".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Audio asset paths and volume
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Background music file (looped)
    pub music: PathBuf,
    /// Pickup sound effect file (one-shot)
    pub pickup: PathBuf,
    /// Playback volume, 1.0 = unity gain
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music: PathBuf::from("assets/audio/music.ogg"),
            pickup: PathBuf::from("assets/audio/pickup.ogg"),
            volume: 0.4,
        }
    }
}

impl GameConfig {
    /// Default config file path, relative to the working directory
    pub const DEFAULT_PATH: &'static str = "star-catcher.toml";

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse`
    /// if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load the config file if it exists, otherwise use defaults
    ///
    /// # Errors
    /// Propagates [`GameConfig::load`] errors for an existing file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("no config at '{}', using defaults", path.display());
            Ok(Self::default())
        }
    }
}
