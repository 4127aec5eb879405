use std::path::{Path, PathBuf};

use std::ops::RangeInclusive;

use anyhow::{ensure, Context, Result};
use presence_engine::DEFAULT_REQUIREMENT_DAYS;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "presence.toml";

/// Accepted values for the credited-day requirement, from config or flag.
pub const REQUIREMENT_RANGE: RangeInclusive<i64> = 1..=36_500;

/// Settings shared by every subcommand. Command-line flags win.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PresenceConfig {
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,

    #[serde(default = "default_requirement")]
    pub requirement: i64,

    #[serde(default)]
    pub include_future_travel: bool,

    /// IANA zone for "today"; the system zone when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            ledger: default_ledger(),
            requirement: default_requirement(),
            include_future_travel: false,
            timezone: None,
        }
    }
}

fn default_ledger() -> PathBuf {
    PathBuf::from("presence.json")
}

fn default_requirement() -> i64 {
    DEFAULT_REQUIREMENT_DAYS
}

impl PresenceConfig {
    /// Load `path`, or the default file if present, or built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        if !required && !path.exists() {
            tracing::debug!("no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        ensure!(
            REQUIREMENT_RANGE.contains(&config.requirement),
            "requirement must be between {} and {} days, got {}",
            REQUIREMENT_RANGE.start(),
            REQUIREMENT_RANGE.end(),
            config.requirement
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(PresenceConfig::from_toml("").unwrap(), PresenceConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let config = PresenceConfig::from_toml(
            r#"
            ledger = "/data/me.json"
            requirement = 1096
            include_future_travel = true
            timezone = "America/Toronto"
            "#,
        )
        .unwrap();
        assert_eq!(config.ledger, PathBuf::from("/data/me.json"));
        assert_eq!(config.requirement, 1096);
        assert!(config.include_future_travel);
        assert_eq!(config.timezone.as_deref(), Some("America/Toronto"));
    }

    #[test]
    fn test_requirement_out_of_range_rejected() {
        let err = PresenceConfig::from_toml("requirement = 0").unwrap_err();
        assert!(err.to_string().contains("requirement must be between"), "got: {err}");
        assert!(PresenceConfig::from_toml("requirement = 9223372036854775807").is_err());
        assert!(PresenceConfig::from_toml("requirement = -5").is_err());
        assert_eq!(PresenceConfig::from_toml("requirement = 36500").unwrap().requirement, 36_500);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(PresenceConfig::from_toml("dark_mode = true").is_err());
    }
}
