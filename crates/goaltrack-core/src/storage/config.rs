//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Pomodoro durations and cycling policy
//! - Notification preferences
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::timer::PomodoroSettings;

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: PomodoroSettings,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_true() -> bool {
    true
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        toml::from_str(&text).map_err(|e| {
            CoreError::Config(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            })
        })
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let text = toml::to_string_pretty(self).map_err(|e| {
            CoreError::Config(ConfigError::SaveFailed {
                path: path.clone(),
                message: e.to_string(),
            })
        })?;
        std::fs::write(&path, text)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key
    /// (e.g. `timer.work_min`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be
    /// parsed as the existing value's type, or saving fails.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let invalid = |message: String| {
            CoreError::Config(ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            })
        };
        let mut json = serde_json::to_value(&*self)?;

        let mut current = &mut json;
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| invalid("unknown key".to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| invalid("unknown key".to_string()))?;
                // The existing value decides the expected type.
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?
                            .into(),
                    ),
                    _ => serde_json::Value::String(value.to_string()),
                };
                obj.insert(part.to_string(), new_value);
            } else {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| invalid("unknown key".to_string()))?;
            }
        }

        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_classic_pomodoro() {
        let config = Config::default();
        assert_eq!(config.timer.work_min, 25);
        assert_eq!(config.timer.short_break_min, 5);
        assert_eq!(config.timer.long_break_min, 15);
        assert_eq!(config.timer.sessions_before_long_break, 4);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.timer.work_min = 50;
        config.notifications.enabled = false;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.timer.work_min, 50);
        assert!(!back.notifications.enabled);
    }

    #[test]
    fn get_reads_dotted_keys() {
        let config = Config::default();
        assert_eq!(config.get("timer.work_min").as_deref(), Some("25"));
        assert_eq!(config.get("timer.auto_advance").as_deref(), Some("true"));
        assert_eq!(config.get("notifications.enabled").as_deref(), Some("true"));
        assert!(config.get("timer").is_none());
        assert!(config.get("no.such.key").is_none());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config: Config = toml::from_str("[timer]\nwork_min = 45\n").unwrap();
        assert_eq!(config.timer.work_min, 45);
        assert_eq!(config.timer.short_break_min, 5);
        assert!(config.notifications.enabled);
    }
}
