use std::io::Write;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::StatusError;

const RETRY_ATTEMPTS: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Serializes `value` to four-space-indented JSON and atomically replaces
/// `path` with the result.
///
/// A fresh temporary file is created in `path`'s parent directory (so the
/// final rename is guaranteed to stay on one filesystem), written and
/// flushed, then persisted onto `path`. Any reader that opens `path`
/// concurrently observes either the previous contents in full or the new
/// contents in full, never a torn write.
///
/// Antivirus scanners and file indexers sometimes hold a transient handle
/// on the target path on Windows; a persist failure in that class is
/// retried up to three times with a one-second pause before giving up.
pub fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StatusError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut temp, formatter);
    value.serialize(&mut serializer)?;
    temp.as_file_mut().flush()?;

    let mut attempt = 0;
    let mut temp = temp;
    loop {
        match temp.persist(path) {
            Ok(_file) => {
                debug!("wrote status document to {}", path.display());
                return Ok(());
            }
            Err(persist_error) => {
                attempt += 1;
                if attempt >= RETRY_ATTEMPTS {
                    return Err(StatusError::PersistFailed(persist_error.error));
                }
                warn!(
                    "failed to replace {} on attempt {attempt}, retrying: {}",
                    path.display(),
                    persist_error.error
                );
                temp = persist_error.file;
                sleep(RETRY_DELAY);
            }
        }
    }
}

/// Reads and parses a JSON document at `path`. Unknown fields are ignored
/// by serde's default struct handling; callers relying on `#[serde(default)]`
/// on optional fields tolerate documents written by an older or
/// differently-scoped writer.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StatusError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Doc {
        a: u32,
        b: String,
    }

    #[test]
    fn round_trips_through_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ascendara.json");

        write_atomic(
            &path,
            &Doc {
                a: 1,
                b: "hello".into(),
            },
        )
        .unwrap();

        let read_back: Doc = read_json(&path).unwrap();
        assert_eq!(
            read_back,
            Doc {
                a: 1,
                b: "hello".into()
            }
        );
    }

    #[test]
    fn overwrite_never_leaves_a_torn_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ascendara.json");

        write_atomic(
            &path,
            &Doc {
                a: 1,
                b: "first".into(),
            },
        )
        .unwrap();
        write_atomic(
            &path,
            &Doc {
                a: 2,
                b: "second".into(),
            },
        )
        .unwrap();

        let read_back: Doc = read_json(&path).unwrap();
        assert_eq!(read_back.a, 2);
        assert_eq!(read_back.b, "second");
    }

    #[test]
    fn indents_with_four_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ascendara.json");
        write_atomic(
            &path,
            &Doc {
                a: 1,
                b: "x".into(),
            },
        )
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"a\""));
    }
}
