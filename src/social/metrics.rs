//! Timing for feed composition.

use std::time::{Duration, Instant};

/// Drop guard that logs how long an operation took.
///
/// Logs at debug level on drop, or at warn level when the elapsed time
/// exceeds the configured threshold.
pub struct PerformanceTimer {
    start: Instant,
    label: &'static str,
    slow_threshold: Duration,
}

impl PerformanceTimer {
    pub fn new(label: &'static str, slow_threshold: Duration) -> Self {
        Self {
            start: Instant::now(),
            label,
            slow_threshold,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_slow(&self) -> bool {
        self.elapsed() > self.slow_threshold
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if elapsed > self.slow_threshold {
            tracing::warn!(
                "⚠️ Slow operation: {} took {:?} (threshold: {:?})",
                self.label,
                elapsed,
                self.slow_threshold
            );
        } else {
            tracing::debug!("⏱️ {} completed in {:?}", self.label, elapsed);
        }
    }
}
