use std::fmt::{Display, Formatter};
use std::io;

/// Errors surfaced by the chunked download engine. `ContentTypeError`
/// exists as its own variant (rather than folding into `Network`) because
/// spec.md §4.2 calls it out by name: a `text/html` body on what should be
/// an archive download means the share link expired.
#[derive(Debug)]
pub enum DownloadError {
    Network(reqwest::Error),
    ContentTypeError(String),
    VerifyFailed { expected: u64, actual: u64 },
    Io(io::Error),
    RetriesExhausted(String),
}

impl Display for DownloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::Network(e) => write!(f, "network error: {e}"),
            DownloadError::ContentTypeError(url) => {
                write!(f, "content_type_error: server returned text/html for {url}, the link has likely expired")
            }
            DownloadError::VerifyFailed { expected, actual } => write!(
                f,
                "chunk verification failed: expected {expected} bytes, got {actual}"
            ),
            DownloadError::Io(e) => write!(f, "io error: {e}"),
            DownloadError::RetriesExhausted(detail) => {
                write!(f, "retries exhausted: {detail}")
            }
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<reqwest::Error> for DownloadError {
    fn from(value: reqwest::Error) -> Self {
        DownloadError::Network(value)
    }
}

impl From<io::Error> for DownloadError {
    fn from(value: io::Error) -> Self {
        DownloadError::Io(value)
    }
}
