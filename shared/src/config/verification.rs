//! Verification code configuration module

use serde::{Deserialize, Serialize};

/// Verification code settings
///
/// Deserialized from the embedding application's configuration and
/// handed to the core service at construction time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationSettings {
    /// Code lifetime in minutes
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,

    /// Max wrong-code attempts before a pending code is invalidated
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum interval between two sends for the same identifier in seconds
    #[serde(default = "default_rate_limit_window_seconds")]
    pub rate_limit_window_seconds: u64,

    /// Number of digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: u32,

    /// Interval between expired-record sweeps in minutes
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,

    /// Timeout budget per delivery attempt in seconds
    #[serde(default = "default_send_timeout_seconds")]
    pub send_timeout_seconds: u64,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            max_attempts: default_max_attempts(),
            rate_limit_window_seconds: default_rate_limit_window_seconds(),
            code_length: default_code_length(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
            send_timeout_seconds: default_send_timeout_seconds(),
        }
    }
}

impl VerificationSettings {
    /// Create a development configuration (short windows for fast iteration)
    pub fn development() -> Self {
        Self {
            rate_limit_window_seconds: 5,
            sweep_interval_minutes: 1,
            ..Default::default()
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self::default()
    }
}

fn default_ttl_minutes() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_rate_limit_window_seconds() -> u64 {
    60 // 1 minute
}

fn default_code_length() -> u32 {
    6
}

fn default_sweep_interval_minutes() -> u64 {
    5
}

fn default_send_timeout_seconds() -> u64 {
    10
}
