//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::verification_record::Purpose;

/// Result of requesting a verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCodeResult {
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
    /// Masked display form of the identifier the code was sent to
    pub masked_identifier: String,
    /// When the caller may request another code for this identifier
    pub next_resend_at: DateTime<Utc>,
}

/// Read-only snapshot of a pending verification, used for UI polling
/// without mutating any state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStatus {
    /// Whether a pending record exists for the key
    pub exists: bool,
    /// Whether that record has already expired
    pub expired: bool,
    /// Wrong-code attempts made so far
    pub attempts: u32,
    /// Attempt budget for the record
    pub max_attempts: u32,
    /// Whole seconds until expiry (0 when absent or expired)
    pub seconds_remaining: i64,
    /// Purpose of the pending code, if one exists
    pub purpose: Option<Purpose>,
}

impl VerificationStatus {
    /// Snapshot for a key with no pending record
    pub fn absent() -> Self {
        Self {
            exists: false,
            expired: false,
            attempts: 0,
            max_attempts: 0,
            seconds_remaining: 0,
            purpose: None,
        }
    }
}
