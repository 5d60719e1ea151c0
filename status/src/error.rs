use std::fmt::{Display, Formatter};
use std::io;

/// Errors raised while reading or atomically replacing a status-style
/// JSON document (StatusDocument, CollectionIndex, SettingsDocument).
#[derive(Debug)]
pub enum StatusError {
    Io(io::Error),
    Serde(serde_json::Error),
    /// The same-directory rename kept failing after all retry attempts.
    PersistFailed(io::Error),
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::Io(e) => write!(f, "io error: {e}"),
            StatusError::Serde(e) => write!(f, "invalid json: {e}"),
            StatusError::PersistFailed(e) => {
                write!(f, "failed to atomically replace status document: {e}")
            }
        }
    }
}

impl std::error::Error for StatusError {}

impl From<io::Error> for StatusError {
    fn from(value: io::Error) -> Self {
        StatusError::Io(value)
    }
}

impl From<serde_json::Error> for StatusError {
    fn from(value: serde_json::Error) -> Self {
        StatusError::Serde(value)
    }
}
