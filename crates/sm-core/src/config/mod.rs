//! Configuration loading and validation for sm-core.
//!
//! This module handles:
//! - The [`MiningConfig`] consumed by the orchestrators
//! - Config resolution order (explicit path > env > XDG > defaults)
//! - Parsing JSON or TOML by file extension
//! - Semantic validation

use crate::fit::FitConfig;
use crate::logging::event_names;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "sim-miner";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SM_CONFIG";

/// File names probed in the config directory, in order.
const CONFIG_FILE_NAMES: [&str; 2] = ["config.toml", "config.json"];

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Semantic validation failed: {0}")]
    Validation(String),
}

/// How durations are grouped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MiningMode {
    /// One distribution per activity.
    #[default]
    Activity,
    /// One distribution per resource and activity.
    Resource,
}

/// Everything the orchestrators need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub mode: MiningMode,
    pub fit: FitConfig,
    /// Keep only observations closed by these resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_filter: Option<BTreeSet<String>>,
    /// Fit independent keys on the rayon pool.
    pub parallel: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            mode: MiningMode::Activity,
            fit: FitConfig::default(),
            resource_filter: None,
            parallel: true,
        }
    }
}

impl MiningConfig {
    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fit.sample_count == Some(0) {
            return Err(ConfigError::Validation(
                "fit.sample_count must be at least 1".to_string(),
            ));
        }
        if let Some(filter) = &self.resource_filter {
            if filter.is_empty() {
                return Err(ConfigError::Validation(
                    "resource_filter is empty; it would drop every observation".to_string(),
                ));
            }
            if filter.iter().any(|r| r.trim().is_empty()) {
                return Err(ConfigError::Validation(
                    "resource_filter contains a blank resource name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line.
    Explicit(PathBuf),
    /// The `SM_CONFIG` environment variable.
    Env(PathBuf),
    /// A file in the XDG config directory.
    Xdg(PathBuf),
    /// Built-in defaults.
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Env(p) | ConfigSource::Xdg(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: MiningConfig,
    pub source: ConfigSource,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority).
    pub config_path: Option<PathBuf>,
    /// Override for the directory probed for `config.toml` / `config.json`.
    pub config_dir: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit path (via ConfigOptions)
/// 2. Environment variable (SM_CONFIG)
/// 3. XDG config home (~/.config/sim-miner/config.{toml,json})
/// 4. Built-in defaults
///
/// An explicitly named file that does not exist is an error; a missing XDG
/// file is not.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let source = resolve_source(options, std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    let config = match source.path() {
        Some(path) => load_config_file(path)?,
        None => {
            tracing::debug!(event = event_names::CONFIG_DEFAULT_USED, "using built-in defaults");
            MiningConfig::default()
        }
    };
    config.validate()?;

    if let Some(path) = source.path() {
        tracing::debug!(
            event = event_names::CONFIG_LOADED,
            path = %path.display(),
            "configuration loaded"
        );
    }
    Ok(ResolvedConfig { config, source })
}

fn resolve_source(options: &ConfigOptions, env_path: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = &options.config_path {
        return ConfigSource::Explicit(path.clone());
    }
    if let Some(path) = env_path {
        return ConfigSource::Env(path);
    }

    let dir = options.config_dir.clone().unwrap_or_else(default_config_dir);
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .map_or(ConfigSource::Defaults, ConfigSource::Xdg)
}

fn default_config_dir() -> PathBuf {
    let xdg_config = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
    xdg_config.join(CONFIG_DIR_NAME)
}

/// Read one config file, choosing TOML or JSON by extension.
pub fn load_config_file(path: &Path) -> Result<MiningConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str::<MiningConfig>(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<MiningConfig>(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_valid() {
        let config = MiningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, MiningMode::Activity);
        assert!(!config.fit.remove_outliers);
        assert!(config.fit.sample_count.is_none());
    }

    #[test]
    fn parses_toml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.toml");
        fs::write(
            &path,
            "mode = \"resource\"\nresource_filter = [\"R1\"]\n\n[fit]\nremove_outliers = true\nsample_count = 500\n",
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.mode, MiningMode::Resource);
        assert!(config.fit.remove_outliers);
        assert_eq!(config.fit.sample_count, Some(500));
        assert_eq!(config.fit.seed, crate::fit::DEFAULT_SEED);
        assert!(config.parallel);
    }

    #[test]
    fn parses_json_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.conf");
        fs::write(&path, r#"{"fit": {"seed": 7}, "parallel": false}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.fit.seed, 7);
        assert!(!config.parallel);
    }

    #[test]
    fn missing_explicit_file_is_not_found() {
        let options = ConfigOptions {
            config_path: Some(PathBuf::from("/nonexistent/sm-config.toml")),
            config_dir: None,
        };
        assert!(matches!(
            load_config(&options),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn invalid_content_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"mode": "weekly"}"#).unwrap();
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validation_rejects_zero_samples_and_empty_filter() {
        let mut config = MiningConfig::default();
        config.fit.sample_count = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = MiningConfig {
            resource_filter: Some(BTreeSet::new()),
            ..MiningConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolution_prefers_explicit_then_env_then_dir() {
        let dir = tempfile::tempdir().unwrap();
        let xdg_file = dir.path().join("config.json");
        fs::write(&xdg_file, "{}").unwrap();

        let explicit = ConfigOptions {
            config_path: Some(PathBuf::from("a.toml")),
            config_dir: Some(dir.path().to_path_buf()),
        };
        assert_eq!(
            resolve_source(&explicit, Some(PathBuf::from("b.toml"))),
            ConfigSource::Explicit(PathBuf::from("a.toml"))
        );

        let from_dir = ConfigOptions {
            config_path: None,
            config_dir: Some(dir.path().to_path_buf()),
        };
        assert_eq!(
            resolve_source(&from_dir, Some(PathBuf::from("b.toml"))),
            ConfigSource::Env(PathBuf::from("b.toml"))
        );
        assert_eq!(resolve_source(&from_dir, None), ConfigSource::Xdg(xdg_file));

        let empty = tempfile::tempdir().unwrap();
        let nothing = ConfigOptions {
            config_path: None,
            config_dir: Some(empty.path().to_path_buf()),
        };
        assert_eq!(resolve_source(&nothing, None), ConfigSource::Defaults);
    }
}
