use std::sync::Mutex;

/// Per-run tally of what an exporter did with each record.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Rows emitted.
    pub kept: usize,
    /// Records outside the target's modes or bands.
    pub filtered: usize,
    /// Records that qualified but lacked a usable field.
    pub skipped: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_kept(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.kept += 1;
        }
    }

    pub fn record_filtered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.filtered += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner.lock().map(|metrics| *metrics).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
