//! Small cross-cutting helpers shared by every worker crate.

pub mod cli;
pub mod logging;
