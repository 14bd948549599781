
use crate::classify::Action;

/// Per-run counters. Every visited word lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub new: usize,
    pub reprocessed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn visited(&self) -> usize {
        self.new + self.reprocessed + self.skipped + self.failed
    }

    pub(crate) fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn record_success(&mut self, action: Action) {
        match action {
            Action::Reprocess => self.reprocessed += 1,
            Action::Process | Action::Skip => self.new += 1,
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed += 1;
    }
}
