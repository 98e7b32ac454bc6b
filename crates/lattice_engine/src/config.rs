//! Engine configuration
//!
//! Typed settings loaded from TOML or RON files. The [`Config`] trait
//! carries the load/save plumbing; concrete config structs only declare
//! fields and defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or saving configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file contents did not parse as the expected structure.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Turning the config back into text failed.
    #[error("config serialize error: {0}")]
    Serialize(String),
    /// The file extension names no supported format.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// File-backed configuration. Format is picked from the extension;
/// `.toml` and `.ron` are supported.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from `path`.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match extension(path) {
            Some("toml") => {
                toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Some("ron") => {
                ron::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat(path.to_owned())),
        }
    }

    /// Save configuration to `path`.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|err| ConfigError::Serialize(err.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|err| ConfigError::Serialize(err.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_owned())),
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|ext| ext.to_str())
}

/// Physics world settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Whether the world steps at all
    pub enabled: bool,
    /// Gravity vector applied to dynamic bodies
    pub gravity: [f32; 3],
    /// Whether bodies are clamped to the ground plane at y = 0
    pub floor_enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gravity: [0.0, -9.81, 0.0],
            floor_enabled: true,
        }
    }
}

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory all script-supplied asset and file paths resolve under
    pub working_dir: PathBuf,
    /// Physics world settings
    pub physics: PhysicsConfig,
}

impl EngineConfig {
    /// Configuration rooted at `working_dir` with default physics.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            physics: PhysicsConfig::default(),
        }
    }

    /// Replace the physics section.
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Config for EngineConfig {}
