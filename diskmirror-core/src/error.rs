//! Error types for diskmirror-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating configuration.
///
/// Every variant is fatal at startup; none of them occur once the sync loop
/// is running.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// Malformed YAML, missing required key, or a value of the wrong type
    /// (e.g. a non-numeric `sync_interval`). Includes line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A field parsed but holds an unusable value.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// `local_folder` does not exist or is not a directory.
    #[error("local folder does not exist: {path}")]
    LocalFolderMissing { path: PathBuf },

    /// `dirs::home_dir()` returned `None`, so the default config path is unknown.
    #[error("cannot determine home directory; set $HOME or pass --config")]
    HomeNotFound,
}
