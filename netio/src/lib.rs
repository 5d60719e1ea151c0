//! The parallel, ranged HTTP download engine (spec.md §4.2): issues a HEAD
//! to discover size and archive type, then either streams a single GET
//! (unknown length) or fans a known-length download out across `N`
//! range-worker threads, retrying each range with exponential backoff and
//! crediting a shared, mutex-guarded progress tracker that persists to a
//! [`status::StatusDocument`].

pub mod client;
pub mod engine;
pub mod error;
pub mod extension;
pub mod format;
pub mod progress;

pub use engine::{probe, run, ProbeResult};
pub use error::DownloadError;
pub use progress::ProgressTracker;
