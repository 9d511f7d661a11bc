//! Planner tunables, stored as TOML.
//!
//! Stores planner tunables:
//! - Scheduler weights, daily budget, and consistency scaling
//! - Points, streak bonus, skip penalty, and level step
//!
//! Configuration is stored at `~/.config/studyplanner/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::progress::ProgressConfig;
use crate::scheduler::SchedulerConfig;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Upper bound for day-count settings (about ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Scheduler and progress settings.
///
/// Serialized to/from TOML at `~/.config/studyplanner/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

impl Config {
    fn lookup_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn assign_path(
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
        if key.is_empty() {
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
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    // "none" clears optional numbers
                    serde_json::Value::Null | serde_json::Value::Number(_) => {
                        if value.eq_ignore_ascii_case("none") {
                            serde_json::Value::Null
                        } else {
                            parse_number(value).ok_or_else(|| {
                                invalid(format!("cannot parse '{value}' as number"))
                            })?
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
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

    /// Default config file location.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// `LoadFailed` for an unreadable or malformed file, `SaveFailed` if the
    /// defaults cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// `SaveFailed` if serializing or writing fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Value at a dot path such as `progress.base_points`, rendered as text.
    pub fn get(&self, key: &str) -> Option<String> {
        let tree = serde_json::to_value(self).ok()?;
        match Self::lookup_path(&tree, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::assign_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges that types alone do not enforce.
    ///
    /// Multipliers must be finite and non-negative; day windows are capped
    /// at [`MAX_WINDOW_DAYS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scheduler = &self.scheduler;
        let multipliers = [
            ("scheduler.coding_multiplier", scheduler.coding_multiplier),
            ("scheduler.college_multiplier", scheduler.college_multiplier),
            ("scheduler.deadline_multiplier", scheduler.deadline_multiplier),
            ("scheduler.streak_boost", scheduler.streak_boost),
            ("scheduler.skip_damping", scheduler.skip_damping),
        ];
        for (key, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        let windows = [
            ("scheduler.lookback_days", i64::from(scheduler.lookback_days)),
            ("scheduler.urgency_window_days", scheduler.urgency_window_days),
        ];
        for (key, value) in windows {
            if !(0..=i64::from(MAX_WINDOW_DAYS)).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between 0 and {MAX_WINDOW_DAYS} days, got {value}"),
                });
            }
        }
        Ok(())
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<f64>() {
        serde_json::Number::from_f64(n).map(serde_json::Value::Number)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("progress.base_points").as_deref(), Some("10"));
        assert_eq!(cfg.get("scheduler.coding_multiplier").as_deref(), Some("1.5"));
        assert_eq!(cfg.get("scheduler.daily_budget_minutes").as_deref(), Some("null"));
        assert!(cfg.get("scheduler.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("progress.skip_penalty", "8").unwrap();
        assert_eq!(cfg.progress.skip_penalty, 8);
        cfg.set("scheduler.coding_multiplier", "2.25").unwrap();
        assert_eq!(cfg.scheduler.coding_multiplier, 2.25);
    }

    #[test]
    fn set_fills_and_clears_optional_budget() {
        let mut cfg = Config::default();
        cfg.set("scheduler.daily_budget_minutes", "240").unwrap();
        assert_eq!(cfg.scheduler.daily_budget_minutes, Some(240));
        cfg.set("scheduler.daily_budget_minutes", "none").unwrap();
        assert_eq!(cfg.scheduler.daily_budget_minutes, None);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("progress.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("progress.base_points", "lots").is_err());
        // Negative does not fit an unsigned field
        assert!(cfg.set("progress.base_points", "-3").is_err());
        assert_eq!(cfg.progress.base_points, 10);
    }

    #[test]
    fn set_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("scheduler.lookback_days", "4000000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("scheduler.urgency_window_days", "-1").is_err());
        assert!(cfg.set("scheduler.coding_multiplier", "-0.5").is_err());
        assert_eq!(cfg, Config::default());

        cfg.set("scheduler.lookback_days", "3650").unwrap();
        assert_eq!(cfg.scheduler.lookback_days, 3650);
    }

    #[test]
    fn load_from_rejects_out_of_range_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[scheduler]\nlookback_days = 4000000000\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_from_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn partial_file_uses_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[progress]\nbase_points = 25\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.progress.base_points, 25);
        assert_eq!(cfg.progress.skip_penalty, 5);
        assert_eq!(cfg.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn toml_round_trip_keeps_budget_override() {
        let mut cfg = Config::default();
        cfg.scheduler.daily_budget_minutes = Some(180);
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }
}
