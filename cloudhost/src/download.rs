//! Sequential, resume-capable per-file download (spec.md §4.3 steps 6-8).
//! The host rate-limits aggressively, so files are fetched one at a time
//! on the calling thread rather than fanned out like the direct
//! downloader's range workers.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{info, warn};
use netio::client::HTTP_CLIENT;
use reqwest::header::{AUTHORIZATION, RANGE};
use reqwest::StatusCode;

use crate::cancel::CancelFlag;
use crate::error::CloudHostError;
use crate::model::FileRecord;
use crate::progress::AggregateProgress;

const CHUNK_SIZE: usize = 32 * 1024;
const RETRY_BUDGET: u32 = 3;

/// Issues a HEAD against `file.link` to learn its size, for the initial
/// share-wide total accumulation (spec.md §4.3 step 6). Already-present
/// complete files (a prior run's `.part` promoted to a final file) count
/// toward both downloaded and total, letting an interrupted share resume
/// across process restarts.
pub fn probe_size(file: &FileRecord, bearer_token: &str) -> Result<u64, CloudHostError> {
    let response = HTTP_CLIENT
        .head(&file.link)
        .header(AUTHORIZATION, format!("Bearer {bearer_token}"))
        .send()?;
    Ok(response.content_length().unwrap_or(0))
}

/// Downloads `file` into `install_dir`, resuming from any existing
/// `<name>.part` by setting `Range: bytes=<part_size>-`. Retries the
/// whole file with exponential backoff up to [`RETRY_BUDGET`] attempts,
/// keeping the `.part` between attempts; deletes it only on final
/// failure or cancellation.
pub fn download_file(
    file: &FileRecord,
    install_dir: &Path,
    bearer_token: &str,
    cancel: &CancelFlag,
    progress: &AggregateProgress,
    progress_key: &str,
) -> Result<PathBuf, CloudHostError> {
    let target_dir = if file.path.is_empty() {
        install_dir.to_path_buf()
    } else {
        install_dir.join(&file.path)
    };
    std::fs::create_dir_all(&target_dir)?;

    let target_path = target_dir.join(&file.filename);
    let part_path = target_dir.join(format!("{}.part", file.filename));

    if target_path.exists() {
        let size = target_path.metadata()?.len();
        progress.set_file_progress(progress_key, size);
        return Ok(target_path);
    }

    let mut last_error = None;
    for attempt in 0..RETRY_BUDGET {
        match try_download(file, &target_path, &part_path, bearer_token, cancel, progress, progress_key) {
            Ok(()) => return Ok(target_path),
            Err(CloudHostError::Cancelled) => {
                let _ = std::fs::remove_file(&part_path);
                return Err(CloudHostError::Cancelled);
            }
            Err(e) => {
                warn!("download of {} attempt {attempt} failed: {e}", file.filename);
                last_error = Some(e);
                if attempt + 1 < RETRY_BUDGET {
                    thread::sleep(Duration::from_secs(2u64.saturating_pow(attempt)));
                }
            }
        }
    }

    let _ = std::fs::remove_file(&part_path);
    Err(CloudHostError::RetriesExhausted(
        last_error.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

fn try_download(
    file: &FileRecord,
    target_path: &Path,
    part_path: &Path,
    bearer_token: &str,
    cancel: &CancelFlag,
    progress: &AggregateProgress,
    progress_key: &str,
) -> Result<(), CloudHostError> {
    let part_size = if part_path.exists() {
        part_path.metadata()?.len()
    } else {
        0
    };

    let response = HTTP_CLIENT
        .get(&file.link)
        .header(AUTHORIZATION, format!("Bearer {bearer_token}"))
        .header(RANGE, format!("bytes={part_size}-"))
        .timeout(Duration::from_secs(27))
        .send()?;

    let status = response.status();
    let (mut part_file, resume_from) = if status == StatusCode::PARTIAL_CONTENT {
        let f = OpenOptions::new().append(true).create(true).open(part_path)?;
        (f, part_size)
    } else if status == StatusCode::OK {
        let mut f = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(part_path)?;
        f.seek(SeekFrom::Start(0))?;
        (f, 0)
    } else {
        return Err(CloudHostError::ApiError(format!(
            "unexpected status {status} for {}",
            file.filename
        )));
    };

    let content_length = response.content_length().unwrap_or(0);
    let expected_total = resume_from + content_length;

    let mut response = response;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut written = resume_from;
    progress.set_file_progress(progress_key, written);

    loop {
        if cancel.is_cancelled() {
            part_file.flush()?;
            return Err(CloudHostError::Cancelled);
        }
        let n = response.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        part_file.write_all(&chunk[..n])?;
        written += n as u64;
        progress.set_file_progress(progress_key, written);
    }
    part_file.flush()?;
    drop(part_file);

    let actual = part_path.metadata()?.len();
    if actual != expected_total {
        return Err(CloudHostError::VerifyFailed {
            expected: expected_total,
            actual,
        });
    }

    std::fs::rename(part_path, target_path)?;
    info!("downloaded {}", target_path.display());
    Ok(())
}

/// A no-resume single-shot download used only by tests exercising the
/// `.part` resume contract end to end via a local server.
#[cfg(test)]
pub fn read_file_to_vec(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut f = File::open(path)?;
    let mut v = Vec::new();
    f.read_to_end(&mut v)?;
    Ok(v)
}
