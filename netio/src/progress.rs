use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::warn;
use status::StatusDocument;

use crate::format::{format_eta, format_percent, format_speed};

const WRITE_THROTTLE: Duration = Duration::from_millis(250);

struct ProgressInner {
    downloaded: u64,
    last_write: Instant,
    doc: StatusDocument,
    download_dir: PathBuf,
}

/// The downloader's shared "credit chunk + recompute progress + write
/// document" critical section (spec.md §5): one mutex guards the byte
/// counter, the recomputed speed/ETA, and the on-disk `StatusDocument`
/// together, so every range-worker thread observes and persists a
/// consistent view. `downloaded` is monotonically non-decreasing except
/// for the retry-rewind in [`rewind`].
pub struct ProgressTracker {
    inner: Mutex<ProgressInner>,
    total: u64,
    start: Instant,
}

impl ProgressTracker {
    pub fn new(total: u64, doc: StatusDocument, download_dir: PathBuf) -> Self {
        ProgressTracker {
            inner: Mutex::new(ProgressInner {
                downloaded: 0,
                last_write: Instant::now() - WRITE_THROTTLE,
                doc,
                download_dir,
            }),
            total,
            start: Instant::now(),
        }
    }

    pub fn downloaded(&self) -> u64 {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).downloaded
    }

    /// Credits `bytes` to the running total; if the write throttle has
    /// elapsed, atomically rewrites the status document. Returns the new
    /// `downloaded` total.
    pub fn credit(&self, bytes: u64) -> u64 {
        self.credit_inner(bytes as i64, false)
    }

    /// Reverses a prior credit after a range-worker retry (spec.md §4.2
    /// step 4): `downloaded` decrements by exactly the bytes already
    /// credited for the abandoned attempt.
    pub fn rewind(&self, bytes: u64) -> u64 {
        self.credit_inner(-(bytes as i64), false)
    }

    /// Forces a write regardless of the throttle, for the first and last
    /// updates of an acquisition.
    pub fn flush(&self) {
        self.credit_inner(0, true);
    }

    fn credit_inner(&self, delta: i64, force: bool) -> u64 {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.downloaded = if delta >= 0 {
            inner.downloaded.saturating_add(delta as u64)
        } else {
            inner.downloaded.saturating_sub((-delta) as u64)
        };
        let downloaded = inner.downloaded;

        if !force && inner.last_write.elapsed() < WRITE_THROTTLE {
            return downloaded;
        }
        inner.last_write = Instant::now();

        let elapsed = self.start.elapsed().as_secs_f64().max(0.001);
        let bytes_per_second = downloaded as f64 / elapsed;
        let remaining = self.total.saturating_sub(downloaded);

        if let Some(data) = inner.doc.downloading_data.as_mut() {
            data.progress_completed = format_percent(downloaded, self.total);
            data.progress_download_speeds = format_speed(bytes_per_second);
            // With an unknown total (HEAD carried no Content-Length) there is
            // nothing to extrapolate an ETA from; report bytes and speed only.
            data.time_until_complete = if self.total == 0 {
                "calculating...".to_string()
            } else {
                format_eta(remaining, bytes_per_second)
            };
        }

        let game = inner.doc.game.clone();
        if let Err(e) = inner.doc.save(&inner.download_dir) {
            warn!("failed to persist progress for {game}: {e}");
        }

        downloaded
    }

    /// Runs `f` against the guarded document (e.g. to blank fields on
    /// fatal failure) and immediately persists the result.
    pub fn mutate_document(&self, f: impl FnOnce(&mut StatusDocument)) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut inner.doc);
        let game = inner.doc.game.clone();
        if let Err(e) = inner.doc.save(&inner.download_dir) {
            warn!("failed to persist status document for {game}: {e}");
        }
    }

    pub fn into_document(self) -> StatusDocument {
        self.inner.into_inner().unwrap_or_else(|p| p.into_inner()).doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use status::StatusDocument;

    fn tracker(total: u64) -> (ProgressTracker, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let doc = StatusDocument::new_acquiring("g", false, false, false, "1", "1 GB", "e");
        (ProgressTracker::new(total, doc, dir.path().to_path_buf()), dir)
    }

    #[test]
    fn credit_is_monotonic_until_a_rewind() {
        let (tracker, _dir) = tracker(1000);
        tracker.credit(100);
        assert_eq!(tracker.downloaded(), 100);
        tracker.credit(200);
        assert_eq!(tracker.downloaded(), 300);
        tracker.rewind(200);
        assert_eq!(tracker.downloaded(), 100);
    }

    #[test]
    fn flush_writes_regardless_of_throttle() {
        let (tracker, _dir) = tracker(1000);
        tracker.credit(500);
        tracker.flush();
        let doc = tracker.into_document();
        let data = doc.downloading_data.as_ref().unwrap();
        assert_eq!(data.progress_completed, "50.00");
    }
}
