use serde::Serialize;
use std::cell::Cell;

/// Per-run counters. Single-threaded: a run consumes one source at a time.
pub struct MetricsRecorder {
    lines: Cell<usize>,
    detections: Cell<usize>,
    rejected: Cell<usize>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lines: usize,
    pub detections: usize,
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            lines: Cell::new(0),
            detections: Cell::new(0),
            rejected: Cell::new(0),
        }
    }

    pub fn record_line(&self) {
        self.lines.set(self.lines.get() + 1);
    }

    pub fn record_detection(&self) {
        self.detections.set(self.detections.get() + 1);
    }

    pub fn record_rejected(&self) {
        self.rejected.set(self.rejected.get() + 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines: self.lines.get(),
            detections: self.detections.get(),
            rejected: self.rejected.get(),
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
