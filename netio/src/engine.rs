//! The ranged, multi-connection download engine (spec.md §4.2).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::header::{CONNECTION, CONTENT_TYPE, RANGE};

use crate::client::HTTP_CLIENT;
use crate::error::DownloadError;
use crate::extension::detect_archive_extension;
use crate::progress::ProgressTracker;

const RANGED_CHUNK: usize = 1024 * 1024;
const STREAM_CHUNK: usize = 8 * 1024;
const RANGED_READ_TIMEOUT: Duration = Duration::from_secs(300);

pub struct ProbeResult {
    pub extension: &'static str,
    pub total: u64,
}

/// Issues the HEAD request of spec.md §4.2 step 1: checks for the
/// `text/html`-means-expired-link signal, derives the archive extension,
/// and reports the declared total size (0 if absent). Split out from
/// [`run`] so a caller can size a [`ProgressTracker`] (whose `total` is
/// fixed at construction) before the download itself starts.
pub fn probe(url: &str) -> Result<ProbeResult, DownloadError> {
    let head = HTTP_CLIENT.head(url).send()?;

    if let Some(content_type) = head.headers().get(CONTENT_TYPE)
        && content_type.to_str().unwrap_or_default().starts_with("text/html")
    {
        return Err(DownloadError::ContentTypeError(url.to_string()));
    }

    Ok(ProbeResult {
        extension: detect_archive_extension(head.headers(), url),
        total: head.content_length().unwrap_or(0),
    })
}

/// Runs the full chunked-download algorithm against `url`, writing the
/// result to `target_path`. `total` is the size already learned from a
/// prior [`probe`] call (0 meaning unknown); `tracker` is
/// credited/rewound and persisted throughout, per spec.md §4.2 steps 2-6.
pub fn run(
    url: &str,
    target_path: &Path,
    total: u64,
    worker_count: u32,
    retry_budget: u32,
    tracker: &ProgressTracker,
) -> Result<u64, DownloadError> {
    if total == 0 {
        info!("no Content-Length for {url}, falling back to a single streaming GET");
        stream_unknown_length(url, target_path, tracker)?;
        return Ok(tracker.downloaded());
    }

    download_ranged(url, target_path, total, worker_count, retry_budget, tracker)?;
    Ok(total)
}

fn stream_unknown_length(
    url: &str,
    target_path: &Path,
    tracker: &ProgressTracker,
) -> Result<(), DownloadError> {
    let mut response = HTTP_CLIENT.get(url).send()?;
    let mut file = File::create(target_path)?;
    let mut chunk = vec![0u8; STREAM_CHUNK];

    loop {
        let n = response.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        file.write_all(&chunk[..n])?;
        tracker.credit(n as u64);
    }
    tracker.flush();
    Ok(())
}

/// Splits `[0, total)` into `worker_count` half-open ranges, the last
/// absorbing any remainder (spec.md §4.2 step 3).
fn partition_ranges(total: u64, worker_count: u32) -> Vec<(u64, u64)> {
    let worker_count = worker_count.max(1) as u64;
    let base = total / worker_count;
    let mut ranges = Vec::new();
    let mut start = 0u64;
    for i in 0..worker_count {
        let end = if i == worker_count - 1 {
            total - 1
        } else {
            start + base - 1
        };
        ranges.push((start, end));
        start = end + 1;
    }
    ranges
}

fn download_ranged(
    url: &str,
    target_path: &Path,
    total: u64,
    worker_count: u32,
    retry_budget: u32,
    tracker: &ProgressTracker,
) -> Result<(), DownloadError> {
    let ranges = partition_ranges(total, worker_count);
    let buffers: Vec<Mutex<Vec<u8>>> = ranges.iter().map(|_| Mutex::new(Vec::new())).collect();
    let first_error: Mutex<Option<DownloadError>> = Mutex::new(None);

    thread::scope(|scope| {
        for (index, (start, end)) in ranges.iter().enumerate() {
            let buf = &buffers[index];
            let first_error = &first_error;
            scope.spawn(move || {
                if let Err(e) = download_range(url, *start, *end, retry_budget, tracker, buf) {
                    let mut slot = first_error.lock().unwrap_or_else(|p| p.into_inner());
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                }
            });
        }
    });

    if let Some(e) = first_error.into_inner().unwrap_or(None) {
        return Err(e);
    }

    tracker.flush();

    let mut file = File::create(target_path)?;
    for buf in buffers {
        let buf = buf.into_inner().unwrap_or_else(|p| p.into_inner());
        file.write_all(&buf)?;
    }
    Ok(())
}

fn download_range(
    url: &str,
    start: u64,
    end: u64,
    retry_budget: u32,
    tracker: &ProgressTracker,
    buf: &Mutex<Vec<u8>>,
) -> Result<(), DownloadError> {
    let expected = end - start + 1;
    let mut last_error = None;

    for attempt in 0..retry_budget {
        match try_download_range(url, start, end, expected, tracker, buf) {
            Ok(()) => return Ok(()),
            Err(e) => {
                let credited = {
                    let mut b = buf.lock().unwrap_or_else(|p| p.into_inner());
                    let len = b.len() as u64;
                    b.clear();
                    len
                };
                tracker.rewind(credited);
                warn!("range {start}-{end} attempt {attempt} failed: {e}");
                last_error = Some(e);

                if attempt + 1 < retry_budget {
                    thread::sleep(Duration::from_secs(2u64.saturating_pow(attempt)));
                }
            }
        }
    }

    Err(DownloadError::RetriesExhausted(
        last_error.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

fn try_download_range(
    url: &str,
    start: u64,
    end: u64,
    expected: u64,
    tracker: &ProgressTracker,
    buf: &Mutex<Vec<u8>>,
) -> Result<(), DownloadError> {
    let mut response = HTTP_CLIENT
        .get(url)
        .header(RANGE, format!("bytes={start}-{end}"))
        .header(CONNECTION, "keep-alive")
        .timeout(RANGED_READ_TIMEOUT)
        .send()?;

    if let Some(content_length) = response.content_length()
        && content_length != expected
    {
        return Err(DownloadError::VerifyFailed {
            expected,
            actual: content_length,
        });
    }

    let mut chunk = vec![0u8; RANGED_CHUNK];
    loop {
        let n = response.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.lock().unwrap_or_else(|p| p.into_inner()).extend_from_slice(&chunk[..n]);
        tracker.credit(n as u64);
    }

    let actual = buf.lock().unwrap_or_else(|p| p.into_inner()).len() as u64;
    if actual != expected {
        return Err(DownloadError::VerifyFailed { expected, actual });
    }
    debug!("range {start}-{end} complete ({actual} bytes)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_absorb_remainder_into_last_range() {
        let ranges = partition_ranges(10, 4);
        assert_eq!(ranges, vec![(0, 1), (2, 3), (4, 5), (6, 9)]);
        let total: u64 = ranges.iter().map(|(s, e)| e - s + 1).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn single_worker_covers_the_whole_range() {
        assert_eq!(partition_ranges(100, 1), vec![(0, 99)]);
    }

    #[test]
    fn ten_mib_over_four_workers_matches_scenario_a() {
        let ranges = partition_ranges(10_485_760, 4);
        assert_eq!(
            ranges,
            vec![
                (0, 2_621_439),
                (2_621_440, 5_242_879),
                (5_242_880, 7_864_319),
                (7_864_320, 10_485_759),
            ]
        );
    }
}
