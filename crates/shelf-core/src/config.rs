//! Shelf configuration
//!
//! Loaded from `$SHELF_CONFIG` or `<config_dir>/shelf/config.toml`.
//! A missing file yields the defaults; every table and key is optional.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SHELF_CONFIG";

const MAX_COOLDOWN_MS: u64 = 60_000;
const MAX_SETTLE_DELAY_MS: u64 = 5_000;
const MAX_LEAD_DAYS: u32 = 30;

/// Timing parameters of a signal debouncer
///
/// Immutable once built; a running debouncer never observes a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Minimum time between two accepted triggers (default: 1000ms)
    cooldown_ms: u64,
    /// Quiet time after the last raw event before a burst counts (default: 200ms)
    settle_delay_ms: u64,
}

impl DebounceConfig {
    pub fn new(cooldown_ms: u64, settle_delay_ms: u64) -> Self {
        Self {
            cooldown_ms,
            settle_delay_ms,
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Check ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cooldown_ms > MAX_COOLDOWN_MS {
            return Err(ConfigError::Invalid {
                key: "shake.cooldown_ms",
                reason: format!("must be between 0 and {}", MAX_COOLDOWN_MS),
            });
        }
        if self.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::Invalid {
                key: "shake.settle_delay_ms",
                reason: format!("must be between 0 and {}", MAX_SETTLE_DELAY_MS),
            });
        }
        Ok(())
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1000,
            settle_delay_ms: 200,
        }
    }
}

/// Shake-to-navigate settings (`[shake]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    #[serde(flatten)]
    pub debounce: DebounceConfig,

    /// Ask for confirmation before navigating (default: false)
    pub confirm_before_action: bool,

    /// Navigate on accepted shakes (default: true)
    ///
    /// Disabled while no member is signed in.
    pub enabled: bool,

    /// Screen opened by a shake (default: "Chat")
    pub target_screen: String,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig::default(),
            confirm_before_action: false,
            enabled: true,
            target_screen: "Chat".to_string(),
        }
    }
}

impl ShakeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.debounce.validate()?;
        if self.target_screen.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "shake.target_screen",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Due-date reminder settings (`[reminders]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Days before the due date to remind on; 0 is the due date itself
    /// (default: [2, 1, 0])
    pub lead_days: Vec<u32>,

    /// Local hour at which reminders fire (default: 9)
    pub reminder_hour: u32,

    /// Currency symbol used in fine amounts (default: "R")
    pub currency: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            lead_days: vec![2, 1, 0],
            reminder_hour: 9,
            currency: "R".to_string(),
        }
    }
}

impl ReminderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reminder_hour > 23 {
            return Err(ConfigError::Invalid {
                key: "reminders.reminder_hour",
                reason: "must be between 0 and 23".to_string(),
            });
        }
        for (i, days) in self.lead_days.iter().enumerate() {
            if *days > MAX_LEAD_DAYS {
                return Err(ConfigError::Invalid {
                    key: "reminders.lead_days",
                    reason: format!("{} exceeds the maximum of {} days", days, MAX_LEAD_DAYS),
                });
            }
            if self.lead_days[..i].contains(days) {
                return Err(ConfigError::Invalid {
                    key: "reminders.lead_days",
                    reason: format!("duplicate entry {}", days),
                });
            }
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "reminders.currency",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub shake: ShakeConfig,
    pub reminders: ReminderConfig,
}

impl ShelfConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shake.validate()?;
        self.reminders.validate()
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let body = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, body).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve the config file location
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("shelf").join("config.toml"))
}

/// Load the config from its default location
pub fn load() -> Result<ShelfConfig, ConfigError> {
    ShelfConfig::load_from(&config_file_path()?)
}

/// Save the config to its default location
pub fn save(config: &ShelfConfig) -> Result<(), ConfigError> {
    config.save_to(&config_file_path()?)
}

/// Write a default config file if none exists; returns its path
pub fn init_if_missing() -> Result<PathBuf, ConfigError> {
    let path = config_file_path()?;
    if !path.exists() {
        ShelfConfig::default().save_to(&path)?;
    }
    Ok(path)
}

/// Annotated example config
pub fn example_config() -> &'static str {
    r#"# Shelf configuration

[shake]
# Minimum time between two accepted shakes (0-60000)
cooldown_ms = 1000
# Quiet time after the last raw event before a burst counts (0-5000)
settle_delay_ms = 200
# Ask before navigating
confirm_before_action = false
# Set to false while no member is signed in
enabled = true
# Screen opened by a shake
target_screen = "Chat"

[reminders]
# Days before the due date (0 = on the due date)
lead_days = [2, 1, 0]
# Local hour reminders fire at (0-23)
reminder_hour = 9
# Currency symbol for fines
currency = "R"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ShelfConfig::load_from(&temp_dir.path().join("nope.toml")).unwrap();

        assert_eq!(config, ShelfConfig::default());
        assert_eq!(config.shake.debounce.cooldown_ms(), 1000);
        assert_eq!(config.shake.debounce.settle_delay_ms(), 200);
        assert_eq!(config.shake.target_screen, "Chat");
        assert_eq!(config.reminders.lead_days, vec![2, 1, 0]);
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: ShelfConfig = toml::from_str(example_config()).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[shake]\ncooldown_ms = 2000\nconfirm_before_action = true\n").unwrap();

        let config = ShelfConfig::load_from(&path).unwrap();
        assert_eq!(config.shake.debounce.cooldown_ms(), 2000);
        assert_eq!(config.shake.debounce.settle_delay_ms(), 200);
        assert!(config.shake.confirm_before_action);
        assert!(config.shake.enabled);
        assert_eq!(config.reminders, ReminderConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/config.toml");

        let mut config = ShelfConfig::default();
        config.shake.debounce = DebounceConfig::new(2000, 150);
        config.shake.target_screen = "BookChat".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(ShelfConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut config = ShelfConfig::default();
        config.shake.debounce = DebounceConfig::new(60_001, 200);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "shake.cooldown_ms", .. })
        ));

        let mut config = ShelfConfig::default();
        config.reminders.reminder_hour = 24;
        assert!(config.validate().is_err());

        let mut config = ShelfConfig::default();
        config.reminders.lead_days = vec![1, 1];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "reminders.lead_days", .. })
        ));

        let mut config = ShelfConfig::default();
        config.shake.target_screen = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ShelfConfig::default();
        config.shake.debounce = DebounceConfig::new(1000, 5_001);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "shake.settle_delay_ms", .. })
        ));

        let mut config = ShelfConfig::default();
        config.reminders.lead_days = vec![31];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "reminders.lead_days", .. })
        ));

        let mut config = ShelfConfig::default();
        config.reminders.currency = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "reminders.currency", .. })
        ));
    }

    #[test]
    fn test_range_limits_are_inclusive() {
        let mut config = ShelfConfig::default();
        config.shake.debounce = DebounceConfig::new(60_000, 5_000);
        config.reminders.lead_days = vec![30, 0];
        config.reminders.reminder_hour = 23;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_file_reports_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[shake\ncooldown_ms = ").unwrap();

        assert!(matches!(
            ShelfConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_timings_are_valid() {
        let config = DebounceConfig::new(0, 0);
        assert!(config.validate().is_ok());
        assert_eq!(config.cooldown(), Duration::ZERO);
        assert_eq!(config.settle_delay(), Duration::ZERO);
    }
}
