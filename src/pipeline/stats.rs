//! Statistics management for the recognition pipeline.

use std::sync::Mutex;

/// Statistics for the recognition pipeline.
///
/// Tracks request counts, outcomes, cache effectiveness, and the running
/// average processing time across all `recognize` calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionStats {
    /// The total number of recognition requests.
    pub total_requests: usize,
    /// The number of requests that returned a result.
    pub successful: usize,
    /// The number of requests that surfaced an error.
    pub failed: usize,
    /// The number of requests answered from the cache.
    pub cache_hits: usize,
    /// The average end-to-end processing time in milliseconds.
    pub average_processing_time_ms: f64,
}

impl RecognitionStats {
    /// Gets the success rate as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.successful as f64 / self.total_requests as f64) * 100.0
        }
    }

    /// Gets the cache hit rate as a percentage (0.0 to 100.0).
    pub fn cache_hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / self.total_requests as f64) * 100.0
        }
    }
}

impl std::fmt::Display for RecognitionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Recognition Statistics:")?;
        writeln!(f, "  Total requests: {}", self.total_requests)?;
        writeln!(
            f,
            "  Successful: {} ({:.1}%)",
            self.successful,
            self.success_rate()
        )?;
        writeln!(f, "  Failed: {}", self.failed)?;
        writeln!(
            f,
            "  Cache hits: {} ({:.1}%)",
            self.cache_hits,
            self.cache_hit_rate()
        )?;
        writeln!(
            f,
            "  Average processing time: {:.2} ms",
            self.average_processing_time_ms
        )?;
        Ok(())
    }
}

/// Statistics management functionality for the recognition pipeline.
pub struct StatsManager {
    /// Statistics for recognition requests (thread-safe).
    stats: Mutex<RecognitionStats>,
}

impl StatsManager {
    /// Creates a new StatsManager instance.
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(RecognitionStats::default()),
        }
    }

    /// Gets a copy of the current statistics.
    pub fn snapshot(&self) -> RecognitionStats {
        self.lock_stats().clone()
    }

    /// Records the outcome of one recognition request.
    ///
    /// # Arguments
    ///
    /// * `success` - Whether the request returned a result
    /// * `cache_hit` - Whether the result came from the cache
    /// * `elapsed_ms` - End-to-end processing time in milliseconds
    pub fn record(&self, success: bool, cache_hit: bool, elapsed_ms: f64) {
        let mut stats = self.lock_stats();

        stats.total_requests += 1;
        if success {
            stats.successful += 1;
        } else {
            stats.failed += 1;
        }
        if cache_hit {
            stats.cache_hits += 1;
        }

        // Incremental average over all requests so far
        let count = stats.total_requests;
        let previous_total = stats.average_processing_time_ms * (count - 1) as f64;
        stats.average_processing_time_ms = (previous_total + elapsed_ms) / count as f64;
    }

    /// Resets the statistics.
    pub fn reset(&self) {
        *self.lock_stats() = RecognitionStats::default();
    }

    fn lock_stats(&self) -> std::sync::MutexGuard<'_, RecognitionStats> {
        match self.stats.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for StatsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_incremental_average() {
        let manager = StatsManager::new();

        manager.record(true, false, 100.0);
        let stats = manager.snapshot();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.average_processing_time_ms, 100.0);

        manager.record(true, true, 200.0);
        let stats = manager.snapshot();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.average_processing_time_ms, 150.0);

        manager.record(false, false, 50.0);
        let stats = manager.snapshot();
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.failed, 1);
        // (100 + 200 + 50) / 3
        assert!((stats.average_processing_time_ms - 116.666).abs() < 0.01);
    }

    #[test]
    fn test_rates() {
        let manager = StatsManager::new();
        assert_eq!(manager.snapshot().success_rate(), 0.0);

        manager.record(true, true, 10.0);
        manager.record(true, false, 10.0);
        manager.record(false, false, 10.0);

        let stats = manager.snapshot();
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
        assert!((stats.cache_hit_rate() - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_reset() {
        let manager = StatsManager::new();
        manager.record(true, false, 500.0);
        assert_eq!(manager.snapshot().total_requests, 1);

        manager.reset();
        assert_eq!(manager.snapshot(), RecognitionStats::default());
    }

    #[test]
    fn test_display_contains_counters() {
        let manager = StatsManager::new();
        manager.record(true, true, 125.0);

        let rendered = manager.snapshot().to_string();
        assert!(rendered.contains("Total requests: 1"));
        assert!(rendered.contains("Successful: 1 (100.0%)"));
        assert!(rendered.contains("Cache hits: 1 (100.0%)"));
        assert!(rendered.contains("Average processing time: 125.00 ms"));
    }
}
