use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::warn;
use netio::format::{format_eta, format_percent, format_speed};
use status::StatusDocument;

const WRITE_THROTTLE: Duration = Duration::from_millis(250);
const SPEED_WINDOW: usize = 5;

struct AggregateInner {
    per_file: HashMap<String, u64>,
    samples: VecDeque<f64>,
    last_sample_time: Instant,
    last_sample_bytes: u64,
    last_write: Instant,
    doc: StatusDocument,
    download_dir: PathBuf,
}

/// Aggregates per-file progress across a whole host-helper share
/// (spec.md §4.3 step 9): `total_downloaded` sums each file's current
/// progress keyed by `(path, filename)`, the instantaneous rate is
/// smoothed over a sliding window of the last five samples, and the ETA
/// is derived from that smoothed rate.
pub struct AggregateProgress {
    inner: Mutex<AggregateInner>,
    total: u64,
    start: Instant,
}

impl AggregateProgress {
    pub fn new(total: u64, doc: StatusDocument, download_dir: PathBuf) -> Self {
        let now = Instant::now();
        AggregateProgress {
            inner: Mutex::new(AggregateInner {
                per_file: HashMap::new(),
                samples: VecDeque::with_capacity(SPEED_WINDOW),
                last_sample_time: now,
                last_sample_bytes: 0,
                last_write: now - WRITE_THROTTLE,
                doc,
                download_dir,
            }),
            total,
            start: now,
        }
    }

    pub fn downloaded(&self) -> u64 {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.per_file.values().sum()
    }

    /// Sets the cumulative bytes downloaded so far for `key`
    /// (`"<path>/<filename>"`) and recomputes/persists aggregate progress
    /// if the write throttle has elapsed.
    pub fn set_file_progress(&self, key: &str, bytes: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.per_file.insert(key.to_string(), bytes);
        self.recompute(&mut inner, false);
    }

    pub fn flush(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        self.recompute(&mut inner, true);
    }

    fn recompute(&self, inner: &mut AggregateInner, force: bool) {
        if !force && inner.last_write.elapsed() < WRITE_THROTTLE {
            return;
        }
        inner.last_write = Instant::now();

        let downloaded: u64 = inner.per_file.values().sum();
        let elapsed_since_sample = inner.last_sample_time.elapsed().as_secs_f64().max(0.001);
        let instantaneous =
            (downloaded.saturating_sub(inner.last_sample_bytes)) as f64 / elapsed_since_sample;

        inner.last_sample_time = Instant::now();
        inner.last_sample_bytes = downloaded;

        if inner.samples.len() == SPEED_WINDOW {
            inner.samples.pop_front();
        }
        inner.samples.push_back(instantaneous);
        let smoothed = inner.samples.iter().sum::<f64>() / inner.samples.len() as f64;

        let remaining = self.total.saturating_sub(downloaded);

        if let Some(data) = inner.doc.downloading_data.as_mut() {
            data.progress_completed = format_percent(downloaded, self.total);
            data.progress_download_speeds = format_speed(smoothed);
            data.time_until_complete = if self.total == 0 {
                "calculating...".to_string()
            } else {
                format_eta(remaining, smoothed)
            };
        }

        let game = inner.doc.game.clone();
        if let Err(e) = inner.doc.save(&inner.download_dir) {
            warn!("failed to persist host-helper progress for {game}: {e}");
        }
    }

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
    use std::thread::sleep;

    fn progress(total: u64) -> (AggregateProgress, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let doc = StatusDocument::new_acquiring("g", false, false, false, "1", "1 GB", "e");
        (AggregateProgress::new(total, doc, dir.path().to_path_buf()), dir)
    }

    #[test]
    fn sums_across_files() {
        let (p, _dir) = progress(1000);
        p.set_file_progress("a/one.bin", 100);
        p.set_file_progress("b/two.bin", 200);
        assert_eq!(p.downloaded(), 300);
    }

    #[test]
    fn flush_persists_regardless_of_throttle() {
        let (p, _dir) = progress(1000);
        p.set_file_progress("a/one.bin", 500);
        sleep(Duration::from_millis(5));
        p.flush();
        let doc = p.into_document();
        assert_eq!(doc.downloading_data.unwrap().progress_completed, "50.00");
    }
}
