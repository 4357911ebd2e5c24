//! Pending verification code entity for SMS and email channels.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// Delivery channel for a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Sms,
    Email,
}

impl Channel {
    /// Returns the canonical wire name of the channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "SMS",
            Channel::Email => "EMAIL",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMS" => Ok(Channel::Sms),
            "EMAIL" => Ok(Channel::Email),
            other => Err(format!("unknown channel: {}", other)),
        }
    }
}

/// Business purpose a verification code was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Verification,
    PasswordReset,
    Login,
    PhoneChange,
    EmailChange,
}

impl Purpose {
    /// Returns the canonical wire name of the purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Verification => "verification",
            Purpose::PasswordReset => "password_reset",
            Purpose::Login => "login",
            Purpose::PhoneChange => "phone_change",
            Purpose::EmailChange => "email_change",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verification" => Ok(Purpose::Verification),
            "password_reset" => Ok(Purpose::PasswordReset),
            "login" => Ok(Purpose::Login),
            "phone_change" => Ok(Purpose::PhoneChange),
            "email_change" => Ok(Purpose::EmailChange),
            other => Err(format!("unknown purpose: {}", other)),
        }
    }
}

/// Storage key for a pending code: channel and identifier concatenated
///
/// SMS and EMAIL codes stay independent even for the same person because
/// the channel is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    /// Builds the key for a channel and an already-normalized identifier
    pub fn new(channel: Channel, identifier: &str) -> Self {
        Self(format!("{}:{}", channel.as_str(), identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pending verification code for one (identifier, channel) pair
///
/// At most one record exists per key at any time; issuing a new code for
/// the same key replaces the prior one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Normalized phone number or email address the code was sent to
    pub identifier: String,

    /// Delivery channel the code was sent through
    pub channel: Channel,

    /// The numeric verification code
    pub code: String,

    /// Purpose the code was issued for
    pub purpose: Purpose,

    /// Opaque reference to the requesting user (may be a temporary id)
    pub user_id: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Number of wrong-code attempts made so far
    pub attempts: u32,

    /// Attempt budget this record was issued with
    pub max_attempts: u32,
}

impl VerificationRecord {
    /// Creates a new pending record for an already-generated code
    ///
    /// # Arguments
    ///
    /// * `identifier` - Normalized phone number or email address
    /// * `channel` - Delivery channel
    /// * `code` - The generated verification code
    /// * `purpose` - Business purpose of the code
    /// * `user_id` - Opaque user reference
    /// * `ttl_minutes` - Minutes until the code expires
    /// * `max_attempts` - Wrong-guess budget before invalidation
    pub fn new(
        identifier: String,
        channel: Channel,
        code: String,
        purpose: Purpose,
        user_id: String,
        ttl_minutes: i64,
        max_attempts: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            identifier,
            channel,
            code,
            purpose,
            user_id,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
            attempts: 0,
            max_attempts,
        }
    }

    /// Storage key for this record
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.channel, &self.identifier)
    }

    /// Checks whether the record is expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks whether the record is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Number of wrong-code attempts still tolerated
    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Whole seconds until expiry at the given instant (0 if already expired)
    pub fn seconds_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
