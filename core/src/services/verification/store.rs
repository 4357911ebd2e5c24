//! Pending-code storage: trait and in-memory implementation

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;

use crate::domain::entities::verification_record::{RecordKey, VerificationRecord};

/// Outcome of an atomic verify-and-consume step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// No record exists for the key
    Missing,
    /// The record was already expired; it has been removed
    Expired,
    /// The code matched; the record has been removed and is returned
    Verified { record: VerificationRecord },
    /// The code did not match; the record remains with attempts left
    Mismatch { remaining_attempts: u32 },
    /// The code did not match and the attempt budget is spent; removed
    Exhausted,
}

/// Storage of pending verification codes
///
/// Implementations must serialize every mutating decision per key:
/// `consume` and `increment_attempts` are single atomic steps that
/// cannot interleave with each other or with `put`/`delete` for the
/// same key, so attempt counts cannot drift across racing calls.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Insert or replace the record stored under its key
    async fn put(&self, record: VerificationRecord);

    /// Snapshot of the record for a key, if any
    async fn get(&self, key: &RecordKey) -> Option<VerificationRecord>;

    /// Run the whole verify decision for a submitted code in one step
    ///
    /// Expiry check, code comparison, attempt counting and any resulting
    /// removal happen without another call observing an intermediate
    /// state.
    async fn consume(&self, key: &RecordKey, code: &str, now: DateTime<Utc>) -> ConsumeOutcome;

    /// Atomically increment the attempt counter for a key
    ///
    /// Returns the new count, or `None` when no record exists (already
    /// consumed, expired or removed by a concurrent call). When the new
    /// count reaches the record's budget, the record is removed in the
    /// same step.
    async fn increment_attempts(&self, key: &RecordKey) -> Option<u32>;

    /// Remove the record for a key (no-op when absent)
    async fn delete(&self, key: &RecordKey);

    /// Remove every record with `expires_at <= now`
    ///
    /// Returns the number of records removed.
    async fn sweep(&self, now: DateTime<Utc>) -> usize;
}

/// In-memory store for pending verification codes
///
/// One coarse lock serializes all mutations, which is plenty at the
/// expected load and keeps every check-then-act sequence race-free. The
/// lock is never held across an await point.
#[derive(Default)]
pub struct MemoryVerificationStore {
    records: Mutex<HashMap<RecordKey, VerificationRecord>>,
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending records currently stored
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RecordKey, VerificationRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn put(&self, record: VerificationRecord) {
        self.lock().insert(record.key(), record);
    }

    async fn get(&self, key: &RecordKey) -> Option<VerificationRecord> {
        self.lock().get(key).cloned()
    }

    async fn consume(&self, key: &RecordKey, code: &str, now: DateTime<Utc>) -> ConsumeOutcome {
        let mut records = self.lock();

        let record = match records.get_mut(key) {
            Some(record) => record,
            None => return ConsumeOutcome::Missing,
        };

        if record.is_expired_at(now) {
            records.remove(key);
            return ConsumeOutcome::Expired;
        }

        if codes_match(&record.code, code) {
            return match records.remove(key) {
                Some(record) => ConsumeOutcome::Verified { record },
                None => ConsumeOutcome::Missing,
            };
        }

        record.attempts += 1;
        if record.attempts >= record.max_attempts {
            records.remove(key);
            return ConsumeOutcome::Exhausted;
        }
        ConsumeOutcome::Mismatch {
            remaining_attempts: record.remaining_attempts(),
        }
    }

    async fn increment_attempts(&self, key: &RecordKey) -> Option<u32> {
        let mut records = self.lock();

        let record = records.get_mut(key)?;
        record.attempts += 1;
        let new_count = record.attempts;
        if new_count >= record.max_attempts {
            records.remove(key);
        }
        Some(new_count)
    }

    async fn delete(&self, key: &RecordKey) {
        self.lock().remove(key);
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| record.expires_at > now);
        before - records.len()
    }
}

/// Constant-time code comparison to keep timing attacks unproductive
fn codes_match(stored: &str, provided: &str) -> bool {
    if stored.len() != provided.len() {
        return false;
    }
    constant_time_eq(stored.as_bytes(), provided.as_bytes())
}
