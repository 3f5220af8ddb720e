//! TOML configuration for `cb`.
//!
//! # Responsibility
//! - Resolve the config file path and parse it into `Config`.
//! - Layer environment overrides on top of file values.
//!
//! # Invariants
//! - A missing default file yields defaults; an explicit `--config` path must exist.
//! - Rejected overrides leave the file value in place and produce a warning.

use anyhow::{Context, Result};
use collabbook_core::default_log_level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "collabbook";
const CONFIG_FILE_NAME: &str = ".collabbook.toml";

pub const CONFIG_PATH_ENV: &str = "COLLABBOOK_CONFIG";
pub const LOG_LEVEL_ENV: &str = "COLLABBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "COLLABBOOK_LOG_DIR";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(default_log_level())
    }

    /// Configured log directory, else `<data-local-dir>/collabbook/logs`.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging.dir.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join(APP_NAME).join("logs"))
        })
    }
}

/// `$COLLABBOOK_CONFIG`, else `~/.collabbook.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Loads the config named by `--config`, or the default location.
///
/// An explicit path must exist; a missing default file yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Applies environment overrides, returning a warning for each ignored value.
pub fn apply_env_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(raw) = lookup(LOG_LEVEL_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.logging.level = Some(trimmed.to_string());
        }
    }

    if let Some(raw) = lookup(LOG_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let dir = PathBuf::from(trimmed);
            if dir.is_absolute() {
                config.logging.dir = Some(dir);
            } else {
                warnings.push(format!(
                    "{LOG_DIR_ENV} must be an absolute path, ignoring `{trimmed}`"
                ));
            }
        }
    }

    if lookup(NO_COLOR_ENV).is_some() {
        config.display.color = false;
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.display.color);

        let config: Config = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config.log_level(), "warn");
        assert!(config.display.color);
    }

    #[test]
    fn read_config_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[display]\ncolor = \"sometimes\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn config_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            logging: LoggingConfig {
                level: Some("trace".to_string()),
                dir: Some(dir.path().join("logs")),
            },
            display: DisplayConfig { color: false },
        };
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(load_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = Config::default();
        let warnings = apply_env_overrides(
            &mut config,
            env(&[
                (LOG_LEVEL_ENV, " error "),
                (LOG_DIR_ENV, "/var/log/collabbook"),
                (NO_COLOR_ENV, ""),
            ]),
        );

        assert!(warnings.is_empty());
        assert_eq!(config.log_level(), "error");
        assert_eq!(
            config.log_dir(),
            Some(PathBuf::from("/var/log/collabbook"))
        );
        assert!(!config.display.color);
    }

    #[test]
    fn relative_log_dir_override_is_ignored_with_warning() {
        let mut config = Config::default();
        let warnings = apply_env_overrides(&mut config, env(&[(LOG_DIR_ENV, "logs")]));

        assert_eq!(warnings.len(), 1);
        assert!(config.logging.dir.is_none());
        assert!(config.display.color);
    }
}
