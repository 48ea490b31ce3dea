use std::collections::HashMap;
use tracing::{info, warn};

/// Progress tracker for fan-out phases that complete items out of order.
/// Logs a line every `progress_interval` completions and a summary at the end.
pub struct ProgressTracker {
    total: usize,
    completed: usize,
    fetched: usize,
    failed: usize,
    start_time: std::time::Instant,
    progress_interval: usize,
    error_counts: HashMap<String, usize>,
}

impl ProgressTracker {
    /// # Arguments
    /// * `total` - Number of items the phase will complete
    /// * `progress_interval` - Log progress every N completions
    pub fn new(total: usize, progress_interval: usize) -> Self {
        if total > 10 {
            info!("Starting operation: {} items to process", total);
        }
        Self {
            total,
            completed: 0,
            fetched: 0,
            failed: 0,
            start_time: std::time::Instant::now(),
            progress_interval: progress_interval.max(1),
            error_counts: HashMap::new(),
        }
    }

    pub fn record_fetched(&mut self) {
        self.fetched += 1;
        self.tick();
    }

    /// Record a failure grouped under `error_category` in the summary
    pub fn record_failed(&mut self, error_category: &str) {
        self.failed += 1;
        *self.error_counts.entry(error_category.to_string()).or_insert(0) += 1;
        self.tick();
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    fn tick(&mut self) {
        self.completed += 1;
        if self.completed % self.progress_interval == 0 {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 { self.completed as f64 / elapsed } else { 0.0 };
            info!(
                "Progress: {}/{} ({:.1} items/sec) | Fetched: {} | Failed: {}",
                self.completed, self.total, rate, self.fetched, self.failed
            );
        }
    }

    /// Log the final summary; WARN when anything failed
    pub fn log_summary(&self, operation_name: &str) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if self.failed > 0 {
            warn!(
                "{} completed: {} total in {:.1}s | Fetched: {} | Failed: {}",
                operation_name, self.total, elapsed, self.fetched, self.failed
            );

            let mut error_entries: Vec<_> = self.error_counts.iter().collect();
            error_entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let error_summary: Vec<String> = error_entries
                .iter()
                .map(|(category, count)| format!("{}: {}", category, count))
                .collect();
            info!("Error breakdown: {}", error_summary.join(", "));
        } else {
            info!(
                "{} completed: {} total in {:.1}s | Fetched: {}",
                operation_name, self.total, elapsed, self.fetched
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut progress = ProgressTracker::new(3, 10);
        progress.record_fetched();
        progress.record_failed("not_found");
        progress.record_fetched();
        assert_eq!(progress.fetched(), 2);
        assert_eq!(progress.failed(), 1);
        progress.log_summary("Movie details");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut progress = ProgressTracker::new(1, 0);
        progress.record_fetched();
        assert_eq!(progress.fetched(), 1);
    }
}
