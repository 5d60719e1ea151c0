use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The process-wide cancellation flag (spec.md §4.3 "Cooperative
/// cancellation"): the only cross-thread control channel the host helper
/// exposes. Set from the OS interrupt/terminate signal handlers; each
/// chunk loop checks it between reads.
#[derive(Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Installs OS signal handlers (interrupt, terminate) that set this
    /// flag. Failure to install is logged and otherwise ignored — a
    /// worker running somewhere `ctrlc` can't hook into should still be
    /// killable by the OS, just not gracefully.
    pub fn install_signal_handler(&self) {
        let flag = self.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.cancel()) {
            log::warn!("failed to install signal handler: {e}");
        }
    }
}

impl Default for CancelFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled_and_latches_on_cancel() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn clones_share_the_same_flag() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}
