use std::fmt::{Display, Formatter};

/// Errors raised while resolving or downloading a host-helper share.
#[derive(Debug)]
pub enum CloudHostError {
    Network(reqwest::Error),
    AccountCreationFailed,
    WtConstantNotFound,
    ApiError(String),
    InvalidShareUrl(String),
    VerifyFailed { expected: u64, actual: u64 },
    Io(std::io::Error),
    Cancelled,
    RetriesExhausted(String),
}

impl Display for CloudHostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CloudHostError::Network(e) => write!(f, "network error: {e}"),
            CloudHostError::AccountCreationFailed => write!(f, "account creation failed"),
            CloudHostError::WtConstantNotFound => {
                write!(f, "could not locate the wt constant in the alljs asset")
            }
            CloudHostError::ApiError(msg) => write!(f, "host api error: {msg}"),
            CloudHostError::InvalidShareUrl(url) => write!(f, "invalid share url: {url}"),
            CloudHostError::VerifyFailed { expected, actual } => write!(
                f,
                "file size mismatch: expected {expected} bytes, got {actual}"
            ),
            CloudHostError::Io(e) => write!(f, "io error: {e}"),
            CloudHostError::Cancelled => write!(f, "download cancelled"),
            CloudHostError::RetriesExhausted(detail) => write!(f, "retries exhausted: {detail}"),
        }
    }
}

impl std::error::Error for CloudHostError {}

impl From<reqwest::Error> for CloudHostError {
    fn from(value: reqwest::Error) -> Self {
        CloudHostError::Network(value)
    }
}

impl From<std::io::Error> for CloudHostError {
    fn from(value: std::io::Error) -> Self {
        CloudHostError::Io(value)
    }
}
