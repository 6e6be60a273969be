//! Configuration file handling for typing-cat.
//!
//! Loads configuration from `~/.config/typing-cat/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::animator::Timings;

/// Configuration file structure for typing-cat.
/// Loaded from ~/.config/typing-cat/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cat: CatConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// `[cat]` section: host-side behavior.
#[derive(Debug, Deserialize)]
pub struct CatConfig {
    /// Whether the cat reacts to keystrokes at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CatConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `[animation]` section: every timing knob of the state machine.
#[derive(Debug, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_rapid_window_ms")]
    pub rapid_window_ms: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
    #[serde(default = "default_burst_threshold")]
    pub burst_threshold: u32,
    #[serde(default = "default_effect_tick_ms")]
    pub effect_tick_ms: u64,
    #[serde(default = "default_shake_ms")]
    pub shake_ms: u64,
    #[serde(default = "default_grow_fade_ms")]
    pub grow_fade_ms: u64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rapid_window_ms: default_rapid_window_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            hide_delay_ms: default_hide_delay_ms(),
            burst_threshold: default_burst_threshold(),
            effect_tick_ms: default_effect_tick_ms(),
            shake_ms: default_shake_ms(),
            grow_fade_ms: default_grow_fade_ms(),
            max_scale: default_max_scale(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rapid_window_ms() -> u64 {
    500
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_hide_delay_ms() -> u64 {
    1000
}

fn default_burst_threshold() -> u32 {
    20
}

fn default_effect_tick_ms() -> u64 {
    25
}

fn default_shake_ms() -> u64 {
    300
}

fn default_grow_fade_ms() -> u64 {
    1200
}

fn default_max_scale() -> f32 {
    2.0
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

impl AnimationConfig {
    /// Convert the config values into validated machine timings.
    ///
    /// Fails when the values cannot produce the striking -> middle ->
    /// hidden idle sequence or a sensible effect timeline.
    pub fn timings(&self) -> Result<Timings, ConfigError> {
        if self.hide_delay_ms <= self.settle_delay_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "hide_delay_ms ({}) must be greater than settle_delay_ms ({})",
                    self.hide_delay_ms, self.settle_delay_ms
                ),
            });
        }
        if self.max_scale < 1.0 {
            return Err(ConfigError::Invalid {
                reason: format!("max_scale ({}) must be at least 1.0", self.max_scale),
            });
        }
        if self.effect_tick_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "effect_tick_ms must be greater than 0".to_string(),
            });
        }
        if self.burst_threshold == 0 {
            return Err(ConfigError::Invalid {
                reason: "burst_threshold must be greater than 0".to_string(),
            });
        }

        Ok(Timings {
            rapid_window: Duration::from_millis(self.rapid_window_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            hide_delay: Duration::from_millis(self.hide_delay_ms),
            burst_threshold: self.burst_threshold,
            effect_tick: Duration::from_millis(self.effect_tick_ms),
            shake_duration: Duration::from_millis(self.shake_ms),
            grow_fade_duration: Duration::from_millis(self.grow_fade_ms),
            max_scale: self.max_scale,
        })
    }
}

/// Default config file location: ~/.config/typing-cat/config.toml
fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typing-cat")
        .join("config.toml")
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Invalid { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}
