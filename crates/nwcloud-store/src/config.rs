//! TOML configuration
//!
//! Looked up at an explicit path or at `<project>/nwcloud.toml`. A missing
//! file means defaults; every section and field is optional.
//!
//! ```toml
//! [backup]
//! on_existing = "skip"      # skip | fail | overwrite
//!
//! [templates]
//! dir = "templates"         # relative to the config file
//!
//! [logging]
//! format = "pretty"         # pretty | json
//! ```
//!
//! `NWCLOUD_BACKUP_ON_EXISTING`, `NWCLOUD_TEMPLATES_DIR` and
//! `NWCLOUD_LOG_FORMAT` override the file.

use crate::templates::{BundledTemplates, DirectoryTemplates};
use nwcloud_core::errors::{ExError, ExErrorKind};
use nwcloud_core::{ExistingBackupPolicy, TemplateProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "nwcloud.toml";

pub const ENV_BACKUP_ON_EXISTING: &str = "NWCLOUD_BACKUP_ON_EXISTING";
pub const ENV_TEMPLATES_DIR: &str = "NWCLOUD_TEMPLATES_DIR";
pub const ENV_LOG_FORMAT: &str = "NWCLOUD_LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable holds an unusable value.
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl From<ConfigError> for ExError {
    fn from(err: ConfigError) -> Self {
        let ex = ExError::new(ExErrorKind::Config).with_op("load_config");
        let ex = match &err {
            ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => ex.with_path(path),
            ConfigError::InvalidEnv { .. } => ex,
        };
        ex.with_message(err.to_string())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected pretty or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// What enable does when a backup already exists
    #[serde(default)]
    pub on_existing: ExistingBackupPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory whose files override the bundled templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NwcloudConfig {
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NwcloudConfig {
    /// Parse TOML text. A relative `templates.dir` is kept as written.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` on invalid TOML or unknown enum values.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load `path`, or defaults if it does not exist. A relative
    /// `templates.dir` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file exists but cannot be read,
    /// `ConfigError::Parse` if it is invalid.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text, path)?;
        if let (Some(dir), Some(base)) = (&config.templates.dir, path.parent()) {
            if dir.is_relative() {
                config.templates.dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    /// Load the config for a project: `explicit` if given, otherwise
    /// `<project_root>/nwcloud.toml`; then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`].
    pub fn resolve(project_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => project_root.join(CONFIG_FILE_NAME),
        };
        let mut config = Self::load_or_default(&path)?;
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment)
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidEnv` for an unparseable value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BACKUP_ON_EXISTING) {
            self.backup.on_existing =
                value
                    .parse()
                    .map_err(|e: ExError| ConfigError::InvalidEnv {
                        var: ENV_BACKUP_ON_EXISTING,
                        value: value.clone(),
                        reason: e.message().to_string(),
                    })?;
        }
        if let Some(value) = lookup(ENV_TEMPLATES_DIR).filter(|v| !v.is_empty()) {
            self.templates.dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = value.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: ENV_LOG_FORMAT,
                value: value.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    /// Template source honouring `templates.dir`
    pub fn template_provider(&self) -> Box<dyn TemplateProvider> {
        match &self.templates.dir {
            Some(dir) => Box::new(DirectoryTemplates::new(dir)),
            None => Box::new(BundledTemplates::new()),
        }
    }
}
