//! Query timing instrumentation for the repositories.

use metrics::histogram;
use std::time::Instant;

/// Times one repository query and records it as a labeled histogram sample.
///
/// Every repository method wraps its query between `QueryTimer::new` and
/// `timer.record()`, so each named query shows up as its own series under
/// `database_query_duration_seconds`.
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    /// Consumes the timer and records the elapsed duration.
    pub fn record(self) {
        histogram!("database_query_duration_seconds", "query" => self.query)
            .record(self.started.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_labels_by_query_name() {
        let timer = QueryTimer::new("test_query");
        assert_eq!(timer.query, "test_query");
        timer.record();
    }
}
