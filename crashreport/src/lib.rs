//! The crash-reporter hand-off contract (spec.md §4.6 / §7): a fixed
//! numeric error taxonomy shared by every worker, plus a register-once
//! mechanism for spawning the external crash-reporter window with a
//! tool id, numeric code, and free-text message.

pub mod handoff;
pub mod taxonomy;

pub use handoff::{report, report_error, CrashInfo};
pub use taxonomy::{ToolId, WorkerError};
