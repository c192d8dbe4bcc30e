//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Alarm pattern, repeat count and volume
//! - Whether sounds play at all, and whether todo completion chimes
//! - Session kind selected at startup
//!
//! Configuration is stored at `~/.config/focustone/config.toml`.
//! Timer and todo state are never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::alarm;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::SessionKind;

pub use crate::alarm::MAX_REPEAT_COUNT;

/// Alarm played when a session expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_repeat_count")]
    pub repeat_count: u32,
    /// 0..=100
    #[serde(default = "default_50")]
    pub volume: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub todo_chime: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub default_kind: SessionKind,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focustone/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

// Default functions
fn default_pattern() -> String {
    alarm::DEFAULT_PATTERN_ID.into()
}
fn default_repeat_count() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            repeat_count: default_repeat_count(),
            volume: 50,
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            todo_chime: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Check values that the TOML types alone don't constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if alarm::find(&self.alarm.pattern).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "alarm.pattern".into(),
                message: format!("no alarm pattern named '{}'", self.alarm.pattern),
            });
        }
        if self.alarm.repeat_count == 0 || self.alarm.repeat_count > MAX_REPEAT_COUNT {
            return Err(ConfigError::InvalidValue {
                key: "alarm.repeat_count".into(),
                message: format!("must be between 1 and {MAX_REPEAT_COUNT}"),
            });
        }
        if self.alarm.volume > 100 {
            return Err(ConfigError::InvalidValue {
                key: "alarm.volume".into(),
                message: "must be between 0 and 100".into(),
            });
        }
        Ok(())
    }

    /// Volume as a 0.0..=1.0 gain.
    pub fn volume_gain(&self) -> f32 {
        self.alarm.volume.min(100) as f32 / 100.0
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any
    /// value in it is out of range.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid. The
    /// config is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = match key {
            "session.default_kind" => value
                .parse::<SessionKind>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?
                .id()
                .to_string(),
            _ => value.trim().to_string(),
        };

        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, &value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }
}
