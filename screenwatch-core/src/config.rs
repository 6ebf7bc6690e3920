use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::keymap::Action;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/load/dataJson";
pub const DEFAULT_ASSET_PREFIX: &str = "/template/content/images/";

/// Calendar overview settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CalendarConfig {
    /// Range shown when no advert carries a start date
    #[serde(default = "default_fallback_start")]
    pub fallback_start: NaiveDate,
    /// Range shown when no advert carries an end date
    #[serde(default = "default_fallback_end")]
    pub fallback_end: NaiveDate,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            fallback_start: default_fallback_start(),
            fallback_end: default_fallback_end(),
        }
    }
}

fn default_fallback_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or_default()
}
fn default_fallback_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 8).unwrap_or_default()
}

/// Online/offline probe of the endpoint host
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConnectivityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_probe_interval")]
    pub interval_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_probe_interval(),
        }
    }
}

fn default_probe_interval() -> u64 {
    5000
}
fn default_true() -> bool {
    true
}

/// Single-character bindings for the semantic actions
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KeyConfig {
    #[serde(default = "default_refresh_key")]
    pub refresh: char,
    #[serde(default = "default_help_key")]
    pub help: char,
    #[serde(default = "default_back_key")]
    pub back: char,
    #[serde(default = "default_calendar_key")]
    pub calendar: char,
    #[serde(default = "default_quit_key")]
    pub quit: char,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            refresh: default_refresh_key(),
            help: default_help_key(),
            back: default_back_key(),
            calendar: default_calendar_key(),
            quit: default_quit_key(),
        }
    }
}

fn default_refresh_key() -> char {
    'r'
}
fn default_help_key() -> char {
    'k'
}
fn default_back_key() -> char {
    'b'
}
fn default_calendar_key() -> char {
    'c'
}
fn default_quit_key() -> char {
    'q'
}

impl KeyConfig {
    pub fn bindings(&self) -> [(char, Action); 5] {
        [
            (self.refresh, Action::Refresh),
            (self.help, Action::Help),
            (self.back, Action::Back),
            (self.calendar, Action::Calendar),
            (self.quit, Action::Quit),
        ]
    }
}

/// Root configuration file structure
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// URL of the player's data endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Path prefix advert content files resolve under
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,

    /// Heading of the screen card
    #[serde(default = "default_team_label")]
    pub team_label: String,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    #[serde(default)]
    pub keys: KeyConfig,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_asset_prefix() -> String {
    DEFAULT_ASSET_PREFIX.into()
}
fn default_team_label() -> String {
    "2023: PX team".into()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            asset_prefix: default_asset_prefix(),
            team_label: default_team_label(),
            calendar: CalendarConfig::default(),
            connectivity: ConnectivityConfig::default(),
            keys: KeyConfig::default(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("endpoint must not be empty")]
    EmptyEndpoint,
    #[error("calendar fallback range is inverted: {start} is after {end}")]
    InvertedFallback { start: NaiveDate, end: NaiveDate },
    #[error("key '{key}' is bound to both {first} and {second}")]
    KeyCollision {
        key: char,
        first: &'static str,
        second: &'static str,
    },
    #[error("connectivity interval must be positive")]
    ZeroInterval,
}

const CONFIG_NAMES: [&str; 4] = [
    "screenwatch.yaml",
    "screenwatch.yml",
    ".screenwatch.yaml",
    ".screenwatch.yml",
];

impl DashboardConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load configuration from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search `SCREENWATCH_CONFIG`, then `start_dir` and its parents.
    /// `Ok(None)` means nothing was found and defaults apply.
    pub fn discover(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        if let Ok(env_path) = std::env::var("SCREENWATCH_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Ok(Some((path.clone(), Self::load(&path)?)));
            }
            tracing::warn!(path = %path.display(), "SCREENWATCH_CONFIG points at a missing file");
        }

        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &CONFIG_NAMES {
                let path = current.join(name);
                if path.exists() {
                    return Ok(Some((path.clone(), Self::load(&path)?)));
                }
            }
            dir = current.parent();
        }

        Ok(None)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        if self.calendar.fallback_start > self.calendar.fallback_end {
            return Err(ConfigError::InvertedFallback {
                start: self.calendar.fallback_start,
                end: self.calendar.fallback_end,
            });
        }

        if self.connectivity.enabled && self.connectivity.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let bindings = self.keys.bindings();
        for (i, (key, action)) in bindings.iter().enumerate() {
            for (other_key, other) in &bindings[i + 1..] {
                if key.eq_ignore_ascii_case(other_key) {
                    return Err(ConfigError::KeyCollision {
                        key: *key,
                        first: action.label(),
                        second: other.label(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn fallback_range(&self) -> (NaiveDate, NaiveDate) {
        (self.calendar.fallback_start, self.calendar.fallback_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DashboardConfig::parse("{}").unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.asset_prefix, DEFAULT_ASSET_PREFIX);
        assert_eq!(config.keys.refresh, 'r');
        assert_eq!(config.keys.help, 'k');
        assert_eq!(config.keys.back, 'b');
        assert_eq!(
            config.fallback_range(),
            (
                NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 10, 8).unwrap()
            )
        );
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
endpoint: http://10.0.0.5:3000/load/dataJson
team_label: Lobby screens
calendar:
  fallback_start: 2024-01-01
  fallback_end: 2024-01-31
connectivity:
  interval_ms: 1500
keys:
  refresh: u
"#;
        let config = DashboardConfig::parse(yaml).unwrap();
        assert_eq!(config.endpoint, "http://10.0.0.5:3000/load/dataJson");
        assert_eq!(config.team_label, "Lobby screens");
        assert_eq!(config.connectivity.interval_ms, 1500);
        assert_eq!(config.keys.refresh, 'u');
        assert_eq!(config.keys.quit, 'q');
    }

    #[test]
    fn test_inverted_fallback_rejected() {
        let yaml = r#"
calendar:
  fallback_start: 2024-02-01
  fallback_end: 2024-01-01
"#;
        assert!(matches!(
            DashboardConfig::parse(yaml),
            Err(ConfigError::InvertedFallback { .. })
        ));
    }

    #[test]
    fn test_key_collision_rejected() {
        let yaml = r#"
keys:
  refresh: B
"#;
        assert!(matches!(
            DashboardConfig::parse(yaml),
            Err(ConfigError::KeyCollision { key: 'B', .. })
        ));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        assert!(matches!(
            DashboardConfig::parse("endpoint: '  '"),
            Err(ConfigError::EmptyEndpoint)
        ));
    }
}
