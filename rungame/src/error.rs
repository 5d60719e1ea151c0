use std::fmt::{Display, Formatter};

/// Errors raised while launching or monitoring a game (spec.md §4.5).
#[derive(Debug)]
pub enum RunGameError {
    Io(std::io::Error),
    Status(status::StatusError),
    /// Neither a `StatusDocument` nor a `CollectionIndex` entry matched
    /// the launched executable (spec.md §4.5 step 1).
    UnknownGame(String),
    /// The executable named by the launch target does not exist on disk.
    MissingExecutable(String),
    /// The process failed to spawn at all.
    LaunchFailure(String),
    /// `downloadDirectory` was absent or empty in the settings document,
    /// required to resolve a custom game's `games.json`.
    MissingDownloadDirectory,
}

impl Display for RunGameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunGameError::Io(e) => write!(f, "io error: {e}"),
            RunGameError::Status(e) => write!(f, "status document error: {e}"),
            RunGameError::UnknownGame(path) => {
                write!(f, "no status document or collection entry found for {path}")
            }
            RunGameError::MissingExecutable(path) => {
                write!(f, "the exe file does not exist: {path}")
            }
            RunGameError::LaunchFailure(detail) => write!(f, "failed to launch game: {detail}"),
            RunGameError::MissingDownloadDirectory => {
                write!(f, "download directory not found in ascendarasettings.json")
            }
        }
    }
}

impl std::error::Error for RunGameError {}

impl From<std::io::Error> for RunGameError {
    fn from(value: std::io::Error) -> Self {
        RunGameError::Io(value)
    }
}

impl From<status::StatusError> for RunGameError {
    fn from(value: status::StatusError) -> Self {
        RunGameError::Status(value)
    }
}

impl From<&RunGameError> for crashreport::WorkerError {
    fn from(value: &RunGameError) -> Self {
        match value {
            RunGameError::MissingExecutable(m) => {
                crashreport::WorkerError::MissingExecutable(m.clone())
            }
            RunGameError::LaunchFailure(m) => crashreport::WorkerError::LaunchFailure(m.clone()),
            RunGameError::MissingDownloadDirectory => {
                crashreport::WorkerError::MissingDownloadDirectory(value.to_string())
            }
            RunGameError::Status(_) | RunGameError::Io(_) => {
                crashreport::WorkerError::SettingsReadError(value.to_string())
            }
            RunGameError::UnknownGame(_) => {
                crashreport::WorkerError::ProcessManageFailure(value.to_string())
            }
        }
    }
}
