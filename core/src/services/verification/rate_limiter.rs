//! Send rate limiting for verification code requests

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::verification_record::RecordKey;

/// Enforces a minimum interval between two sends for the same key
///
/// Holds one mark per (identifier, channel) key with the time of the
/// last send attempt. Marks are overwritten on every send and never
/// swept; only the delta to now matters, so stale marks age out of
/// relevance on their own.
pub struct SendRateLimiter {
    window: Duration,
    marks: Mutex<HashMap<RecordKey, DateTime<Utc>>>,
}

impl SendRateLimiter {
    /// Create a limiter with the given window in seconds
    ///
    /// A zero window disables limiting entirely.
    pub fn new(window_seconds: u64) -> Self {
        Self {
            window: Duration::seconds(window_seconds as i64),
            marks: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether a send for this key is currently limited
    pub fn is_limited(&self, key: &RecordKey, now: DateTime<Utc>) -> bool {
        if self.window.is_zero() {
            return false;
        }
        self.lock()
            .get(key)
            .map(|last_sent_at| now - *last_sent_at < self.window)
            .unwrap_or(false)
    }

    /// Seconds until a send for this key is allowed again
    ///
    /// Returns `None` when the key is not limited. A limited key always
    /// reports at least one second so callers can show a usable delay.
    pub fn seconds_until_allowed(&self, key: &RecordKey, now: DateTime<Utc>) -> Option<i64> {
        if self.window.is_zero() {
            return None;
        }
        let marks = self.lock();
        let last_sent_at = marks.get(key)?;
        let remaining = *last_sent_at + self.window - now;
        if remaining > Duration::zero() {
            Some(remaining.num_seconds().max(1))
        } else {
            None
        }
    }

    /// Record a send attempt for this key, overwriting any earlier mark
    pub fn record(&self, key: &RecordKey, now: DateTime<Utc>) {
        self.lock().insert(key.clone(), now);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RecordKey, DateTime<Utc>>> {
        self.marks.lock().unwrap_or_else(|e| e.into_inner())
    }
}
