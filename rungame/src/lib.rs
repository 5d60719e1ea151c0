//! The game handler's launch-and-monitor lifecycle (spec.md §4.5):
//! resolves which document a launch belongs to, spawns the executable
//! detached, polls it to completion while accumulating play time and
//! launch count, and optionally advertises rich presence for the
//! duration.

pub mod error;
pub mod presence;
pub mod process;
pub mod target;

pub use error::RunGameError;
pub use presence::{DiscordPresence, NoopPresence, PresenceClient};
pub use process::launch_and_monitor;
pub use target::GameTarget;
