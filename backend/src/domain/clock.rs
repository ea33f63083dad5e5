//! Timestamp source for validation log entries.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use mockable::Clock;

/// Wraps a [`Clock`] so consecutive readings strictly increase.
///
/// Readings are truncated to microseconds, the precision the log exposes.
/// When the wrapped clock stalls or steps backwards the previous reading is
/// advanced by one microsecond instead, which keeps `(timestamp, card_id)`
/// unique and timestamps ordered by insertion.
pub struct MonotonicClock {
    inner: Arc<dyn Clock>,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    /// Wrap `inner`.
    pub fn new(inner: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }

    /// Raise the floor so later readings come strictly after `seen`.
    pub fn observe(&self, seen: DateTime<Utc>) {
        let seen = seen.trunc_subsecs(6);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.is_none_or(|previous| previous < seen) {
            *last = Some(seen);
        }
    }

    /// Next timestamp, strictly later than any previously returned.
    pub fn next(&self) -> DateTime<Utc> {
        let reading = self.inner.utc().trunc_subsecs(6);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(previous) if reading <= previous => previous + TimeDelta::microseconds(1),
            _ => reading,
        };
        *last = Some(next);
        next
    }
}
