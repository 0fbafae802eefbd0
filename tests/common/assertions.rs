//! Custom test assertions
//!
//! Provides domain-specific assertions for batch summaries.

use backoffice_rs::BatchSummary;

/// Assertions for BatchSummary
pub trait SummaryAssertions {
    /// Assert every item either completed or failed
    fn assert_all_settled(&self);

    /// Assert results and errors are in original item order
    fn assert_ordered(&self);
}

impl<T, R> SummaryAssertions for BatchSummary<T, R> {
    fn assert_all_settled(&self) {
        assert!(!self.cancelled, "Expected a run that was not cancelled");
        assert_eq!(
            self.completed + self.failed,
            self.total,
            "Expected every item to settle, got {} completed and {} failed of {}",
            self.completed,
            self.failed,
            self.total
        );
        assert_eq!(self.results.len(), self.completed);
        assert_eq!(self.errors.len(), self.failed);
    }

    fn assert_ordered(&self) {
        assert!(
            self.results.windows(2).all(|w| w[0].index < w[1].index),
            "Expected results sorted by index"
        );
        assert!(
            self.errors.windows(2).all(|w| w[0].index < w[1].index),
            "Expected errors sorted by index"
        );
    }
}

/// Assert a duration is within bounds
#[macro_export]
macro_rules! assert_duration_within {
    ($duration:expr, $min_ms:expr, $max_ms:expr) => {
        let millis = $duration.as_millis();
        assert!(
            millis >= $min_ms && millis <= $max_ms,
            "Duration {}ms not within [{}ms, {}ms]",
            millis,
            $min_ms,
            $max_ms
        );
    };
}
