use std::fmt::{Display, Formatter};
use std::io;

/// Errors surfaced by archive extraction and layout normalization
/// (spec.md §4.4).
#[derive(Debug)]
pub enum InstallError {
    Io(io::Error),
    Zip(zip::result::ZipError),
    #[cfg(windows)]
    Unrar(unrar::error::UnrarError),
    #[cfg(not(windows))]
    SevenZip(String),
    UnsupportedArchive(String),
}

impl Display for InstallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::Io(e) => write!(f, "io error: {e}"),
            InstallError::Zip(e) => write!(f, "zip error: {e}"),
            #[cfg(windows)]
            InstallError::Unrar(e) => write!(f, "rar error: {e}"),
            #[cfg(not(windows))]
            InstallError::SevenZip(e) => write!(f, "archive error: {e}"),
            InstallError::UnsupportedArchive(ext) => {
                write!(f, "no extractor available for .{ext} archives on this platform")
            }
        }
    }
}

impl std::error::Error for InstallError {}

impl From<io::Error> for InstallError {
    fn from(value: io::Error) -> Self {
        InstallError::Io(value)
    }
}

impl From<zip::result::ZipError> for InstallError {
    fn from(value: zip::result::ZipError) -> Self {
        InstallError::Zip(value)
    }
}

#[cfg(windows)]
impl From<unrar::error::UnrarError> for InstallError {
    fn from(value: unrar::error::UnrarError) -> Self {
        InstallError::Unrar(value)
    }
}
