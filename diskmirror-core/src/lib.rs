//! diskmirror core library — domain types, configuration, errors.
//!
//! - [`types`] — file names and listing entries
//! - [`config`] — load / resolve / validate the startup record
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{LogFormat, SyncConfig, Timeouts};
pub use error::ConfigError;
pub use types::{FileName, LocalFileEntry, LocalFiles, RemoteFileEntry};
