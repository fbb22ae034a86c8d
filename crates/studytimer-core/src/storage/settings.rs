//! TOML-based persisted settings.
//!
//! Stores:
//! - Study and break durations (seconds)
//! - Cumulative study time (whole seconds)
//! - Theme colours, carried opaquely for whatever front-end renders them
//!
//! Settings are stored at `~/.config/studytimer/settings.toml`. Every field has
//! a default, so a partially written file is merged with defaults on load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, TimerError};
use crate::timer::{SessionConfig, DEFAULT_BREAK_MIN, DEFAULT_STUDY_MIN};

const FILE_NAME: &str = "settings.toml";

/// Colour palette. Not interpreted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_card_color")]
    pub card_color: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_progress_color")]
    pub progress_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_study_duration")]
    pub study_duration_seconds: u64,
    #[serde(default = "default_break_duration")]
    pub break_duration_seconds: u64,
    #[serde(default)]
    pub total_study_seconds: u64,
    #[serde(default)]
    pub theme: Theme,
}

// Default functions
fn default_study_duration() -> u64 {
    DEFAULT_STUDY_MIN * 60
}
fn default_break_duration() -> u64 {
    DEFAULT_BREAK_MIN * 60
}
fn default_background_color() -> String {
    "#FFE5EC".into()
}
fn default_card_color() -> String {
    "#FFD6E0".into()
}
fn default_accent_color() -> String {
    "#FF9BB5".into()
}
fn default_progress_color() -> String {
    "#FF9BB5".into()
}
fn default_text_color() -> String {
    "#FFFFFF".into()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            card_color: default_card_color(),
            accent_color: default_accent_color(),
            progress_color: default_progress_color(),
            text_color: default_text_color(),
        }
    }
}

impl Theme {
    /// Names accepted by [`Theme::preset`].
    pub const PRESETS: [&'static str; 3] = ["pink", "blue", "green"];

    /// Built-in palette by name (case-insensitive). `pink` is the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown name.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let palette = |background: &str, card: &str, accent: &str| Self {
            background_color: background.into(),
            card_color: card.into(),
            accent_color: accent.into(),
            progress_color: accent.into(),
            text_color: default_text_color(),
        };
        match name.to_ascii_lowercase().as_str() {
            "pink" => Ok(Self::default()),
            "blue" => Ok(palette("#E3F2FD", "#BBDEFB", "#42A5F5")),
            "green" => Ok(palette("#E8F5E9", "#C8E6C9", "#66BB6A")),
            _ => Err(ConfigError::InvalidValue {
                key: "theme".into(),
                message: format!(
                    "unknown preset '{name}', expected one of: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            study_duration_seconds: default_study_duration(),
            break_duration_seconds: default_break_duration(),
            total_study_seconds: 0,
            theme: Theme::default(),
        }
    }
}

impl Settings {
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

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot overwrite a whole section".into()));
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

    /// Default location of the settings file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(FILE_NAME))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the defaults cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning defaults on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default settings");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, keeping the existing value's type.
    /// Durations are re-validated. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse or
    /// validate. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let candidate: Settings = serde_json::from_value(json).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        if key.ends_with("_duration_seconds") {
            candidate
                .session_config()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }

        *self = candidate;
        Ok(())
    }

    /// Validated durations for the timer engine.
    pub fn session_config(&self) -> Result<SessionConfig, TimerError> {
        SessionConfig::new(self.study_duration_seconds, self.break_duration_seconds)
    }

    /// Store durations from a validated configuration.
    pub fn apply_config(&mut self, config: SessionConfig) {
        self.study_duration_seconds = config.study_duration_secs();
        self.break_duration_seconds = config.break_duration_secs();
    }

    /// Store the engine's study total, truncated to whole seconds.
    pub fn record_total(&mut self, total: Duration) {
        self.total_study_seconds = total.as_secs();
    }

    pub fn total_study(&self) -> Duration {
        Duration::from_secs(self.total_study_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
        assert_eq!(parsed.study_duration_seconds, 1_800);
        assert_eq!(parsed.break_duration_seconds, 300);
    }

    #[test]
    fn partial_file_merges_defaults() {
        let parsed: Settings = toml::from_str(
            "total_study_seconds = 42\n[theme]\naccent_color = \"#000000\"\n",
        )
        .unwrap();
        assert_eq!(parsed.total_study_seconds, 42);
        assert_eq!(parsed.study_duration_seconds, 1_800);
        assert_eq!(parsed.theme.accent_color, "#000000");
        assert_eq!(parsed.theme.text_color, "#FFFFFF");
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);

        let mut settings = Settings::default();
        settings.apply_config(SessionConfig::from_minutes(50, 10).unwrap());
        settings.record_total(Duration::from_millis(7_250_900));
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.study_duration_seconds, 3_000);
        assert_eq!(loaded.break_duration_seconds, 600);
        assert_eq!(loaded.total_study_seconds, 7_250);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "study_duration_seconds = \"soon\"").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn save_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join(FILE_NAME);
        assert!(matches!(
            Settings::default().save_to(&path),
            Err(ConfigError::SaveFailed { .. })
        ));
    }

    #[test]
    fn invalid_persisted_durations_are_rejected() {
        let settings = Settings {
            study_duration_seconds: 12_000,
            ..Settings::default()
        };
        assert!(matches!(
            settings.session_config(),
            Err(TimerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let settings = Settings::default();
        assert_eq!(settings.get("study_duration_seconds").as_deref(), Some("1800"));
        assert_eq!(settings.get("theme.card_color").as_deref(), Some("#FFD6E0"));
        assert!(settings.get("theme.missing_key").is_none());
        assert!(settings.get("").is_none());
    }

    #[test]
    fn set_updates_nested_string() {
        let mut settings = Settings::default();
        settings.set("theme.accent_color", "#FF5733").unwrap();
        assert_eq!(settings.theme.accent_color, "#FF5733");
    }

    #[test]
    fn set_validates_durations() {
        let mut settings = Settings::default();
        settings.set("break_duration_seconds", "600").unwrap();
        assert_eq!(settings.break_duration_seconds, 600);

        let err = settings.set("break_duration_seconds", "7200").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(settings.break_duration_seconds, 600);

        assert!(settings.set("study_duration_seconds", "half").is_err());
    }

    #[test]
    fn theme_presets() {
        assert_eq!(Theme::preset("pink").unwrap(), Theme::default());

        let blue = Theme::preset("Blue").unwrap();
        assert_eq!(blue.background_color, "#E3F2FD");
        assert_eq!(blue.card_color, "#BBDEFB");
        assert_eq!(blue.accent_color, "#42A5F5");
        assert_eq!(blue.progress_color, "#42A5F5");
        assert_eq!(blue.text_color, "#FFFFFF");

        let green = Theme::preset("green").unwrap();
        assert_eq!(green.background_color, "#E8F5E9");
        assert_eq!(green.card_color, "#C8E6C9");
        assert_eq!(green.progress_color, "#66BB6A");

        assert!(matches!(
            Theme::preset("purple"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_rejects_unknown_key_and_sections() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("theme.nonexistent_key", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(settings.set("theme", "{}").is_err());
        assert_eq!(settings, Settings::default());
    }
}
