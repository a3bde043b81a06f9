use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{provider::openweather::DEFAULT_BASE_URL, timezone::TimezoneId};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_timezone = "Asia/Kolkata"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Zone used when coordinates cannot be resolved, and pre-selected in
    /// timezone listings.
    pub default_timezone: String,

    /// Request timeout for the weather provider, in seconds.
    pub timeout_secs: u64,

    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk and apply the `WEATHER_API_KEY` override.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_with_env(&path, std::env::var(API_KEY_ENV).ok())
    }

    /// Load config from `path`, letting `env_api_key` (the value of
    /// `WEATHER_API_KEY`) replace the stored key.
    pub fn load_with_env(path: &Path, env_api_key: Option<String>) -> Result<Self> {
        Ok(Self::load_from(path)?.with_api_key_override(env_api_key))
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored key with `key` when it is set and non-empty.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// The configured default zone as a validated identifier.
    pub fn default_timezone_id(&self) -> Result<TimezoneId> {
        TimezoneId::parse(&self.default_timezone).map_err(|e| {
            anyhow!(
                "Invalid default_timezone in configuration: {e}\n\
                 Hint: use an IANA name such as `{DEFAULT_TIMEZONE}`."
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();

        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.default_timezone, "Asia/Kolkata");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let cfg = Config {
            api_key: Some("FILE_KEY".into()),
            ..Config::default()
        };

        let cfg = cfg.with_api_key_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn empty_override_keeps_stored_key() {
        let cfg = Config {
            api_key: Some("FILE_KEY".into()),
            ..Config::default()
        };

        let cfg = cfg
            .with_api_key_override(Some("  ".into()))
            .with_api_key_override(None);
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn env_key_wins_over_file_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"FILE_KEY\"\ntimeout_secs = 4\n").unwrap();

        let cfg = Config::load_with_env(&path, Some("ENV_KEY".into())).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.timeout_secs, 4);

        let cfg = Config::load_with_env(&path, None).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn env_key_applies_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let cfg = Config::load_with_env(&path, Some("ENV_KEY".into())).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.default_timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            default_timezone: "Europe/Paris".into(),
            timeout_secs: 3,
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.default_timezone, DEFAULT_TIMEZONE);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn default_timezone_id_validates_name() {
        let cfg = Config::default();
        assert_eq!(cfg.default_timezone_id().unwrap().name(), "Asia/Kolkata");

        let cfg = Config {
            default_timezone: "Mars/Olympus_Mons".into(),
            ..Config::default()
        };
        let err = cfg.default_timezone_id().unwrap_err();
        assert!(err.to_string().contains("Invalid default_timezone"));
    }
}
