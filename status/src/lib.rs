//! Read/write access to the JSON documents every worker coordinates
//! through: the per-game `StatusDocument`, the custom-game `CollectionIndex`,
//! and the process-wide `SettingsDocument`. All writes go through
//! [`atomic_write::write_atomic`], which never leaves a torn file for a
//! concurrent reader to observe.

pub mod atomic_write;
pub mod collection;
pub mod document;
pub mod error;
pub mod paths;
pub mod settings;

pub use collection::{CollectionIndex, CustomGameEntry};
pub use document::{DownloadingData, StatusDocument};
pub use error::StatusError;
pub use settings::SettingsDocument;
