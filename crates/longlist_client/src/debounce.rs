//! Trailing-edge search debounce.
//!
//! Every raw update (re)starts the quiet interval; the value settles only once
//! the interval elapses with no further update. The caller supplies the clock
//! so the debouncer can be driven from any event loop.

use longlist_core::constants::SEARCH_DEBOUNCE_MS;
use std::time::{Duration, Instant};

/// Default quiet interval before a query settles.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(SEARCH_DEBOUNCE_MS);

#[derive(Debug)]
pub struct SearchDebouncer {
    interval: Duration,
    pending: Option<(String, Instant)>,
    settled: String,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            settled: String::new(),
        }
    }

    /// Record a raw query update at `now`, cancelling any pending commit.
    pub fn update(&mut self, raw: impl Into<String>, now: Instant) {
        self.pending = Some((raw.into(), now + self.interval));
    }

    /// Commit the pending value if its quiet interval has elapsed.
    ///
    /// # Returns
    /// The new settled query when it differs from the previous one. Settling
    /// to an unchanged value returns `None`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if !due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }

    pub fn settled(&self) -> &str {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will settle, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn burst_of_updates_settles_once_to_last_value() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        for (step, raw) in ["i", "it", "ite", "item"].into_iter().enumerate() {
            let at = start + Duration::from_millis(100 * step as u64);
            debouncer.update(raw, at);
            assert_eq!(debouncer.poll(at), None);
        }

        let last_update = start + Duration::from_millis(300);
        assert_eq!(debouncer.poll(last_update + INTERVAL - Duration::from_millis(1)), None);
        assert_eq!(debouncer.poll(last_update + INTERVAL), Some("item".to_string()));
        assert_eq!(debouncer.poll(last_update + INTERVAL * 4), None);
        assert_eq!(debouncer.settled(), "item");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn later_update_restarts_the_interval() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        debouncer.update("a", start);
        debouncer.update("ab", start + Duration::from_millis(400));
        assert_eq!(debouncer.poll(start + INTERVAL), None, "first deadline was cancelled");
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(400) + INTERVAL)
        );
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(900)),
            Some("ab".to_string())
        );
    }

    #[test]
    fn settling_back_to_the_same_value_is_not_a_change() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        debouncer.update("5", start);
        assert_eq!(debouncer.poll(start + INTERVAL), Some("5".to_string()));

        debouncer.update("55", start + INTERVAL);
        debouncer.update("5", start + INTERVAL + Duration::from_millis(10));
        assert_eq!(debouncer.poll(start + INTERVAL * 3), None);
        assert_eq!(debouncer.settled(), "5");

        debouncer.update("", start + INTERVAL * 3);
        assert_eq!(debouncer.poll(start + INTERVAL * 4), Some(String::new()));
    }
}
