//! # diskmirror-remote
//!
//! The remote side of the mirror: the [`RemoteStore`] capability and its
//! Yandex Disk implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use diskmirror_core::Timeouts;
//! use diskmirror_remote::{RemoteStore, YandexDisk};
//!
//! fn show(token: &str) {
//!     let disk = YandexDisk::new(
//!         "https://cloud-api.yandex.net",
//!         token,
//!         "disk:/Backup",
//!         Timeouts::default(),
//!     );
//!     if let Ok(entries) = disk.list() {
//!         for entry in entries {
//!             println!("{}", entry.name);
//!         }
//!     }
//! }
//! ```

pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod store;
pub mod yandex;

pub use error::RemoteError;
pub use store::RemoteStore;
pub use yandex::YandexDisk;
