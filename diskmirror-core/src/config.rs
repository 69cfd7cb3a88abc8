//! Startup configuration.
//!
//! # File format
//!
//! ```yaml
//! local_folder: /home/me/outbox
//! remote_folder: disk:/Backup
//! token: AQAAAA...
//! sync_interval: 60          # seconds
//! log_file: /var/log/diskmirror.log
//! # optional
//! api_base_url: https://cloud-api.yandex.net
//! permanently_delete: false
//! log_format: text           # or json
//! timeouts:
//!   connect_secs: 10
//!   read_secs: 10
//!   upload_secs: 30
//! ```
//!
//! # Resolution order
//!
//! 1. an explicit path (`--config`)
//! 2. `./config.yaml` in the working directory
//! 3. `<home>/.diskmirror/config.yaml`
//!
//! As with the rest of the workspace, `fn_at(home: &Path, …)` takes an explicit
//! home and `fn(…)` derives it from `dirs::home_dir()`. Tests use `_at`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_API_BASE_URL: &str = "https://cloud-api.yandex.net";

// ---------------------------------------------------------------------------
// 1. Types
// ---------------------------------------------------------------------------

/// Immutable startup record consumed by the daemon and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    pub local_folder: PathBuf,
    pub remote_folder: String,
    pub token: String,
    /// Seconds to sleep between the end of one cycle and the start of the next.
    pub sync_interval: u64,
    pub log_file: PathBuf,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub permanently_delete: bool,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Format of the log file lines. The console always gets text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Network timeouts for the remote client, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    pub connect_secs: u64,
    pub read_secs: u64,
    /// Overall bound on a single file body upload.
    pub upload_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            read_secs: 10,
            upload_secs: 30,
        }
    }
}

impl Timeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    pub fn upload(&self) -> Duration {
        Duration::from_secs(self.upload_secs)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval)
    }

    /// Check values that serde cannot express, plus the local folder's presence.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "sync_interval",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "token",
                reason: "must not be empty".to_string(),
            });
        }
        if self.remote_folder.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "remote_folder",
                reason: "must not be empty".to_string(),
            });
        }
        for (field, secs) in [
            ("timeouts.connect_secs", self.timeouts.connect_secs),
            ("timeouts.read_secs", self.timeouts.read_secs),
            ("timeouts.upload_secs", self.timeouts.upload_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1 second".to_string(),
                });
            }
        }
        if !self.local_folder.is_dir() {
            return Err(ConfigError::LocalFolderMissing {
                path: self.local_folder.clone(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 2. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.diskmirror/config.yaml` — pure, no I/O.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(".diskmirror").join(CONFIG_FILE)
}

/// Pick the config path following the resolution order in the module docs.
pub fn resolve_path_at(explicit: Option<&Path>, cwd: &Path, home: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = cwd.join(CONFIG_FILE);
    if local.is_file() {
        return local;
    }
    default_path_at(home)
}

/// `resolve_path_at` using the process working directory and `dirs::home_dir()`.
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    Ok(resolve_path_at(None, &cwd, &home()?))
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Parse a config file. Does not validate; call [`SyncConfig::validate`].
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed.
pub fn load_at(path: &Path) -> Result<SyncConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse config YAML from a string.
pub fn parse(contents: &str) -> Result<SyncConfig, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}

/// Resolve, load and validate in one step.
pub fn load(explicit: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let path = resolve_path(explicit)?;
    let config = load_at(&path)?;
    config.validate()?;
    Ok(config)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
