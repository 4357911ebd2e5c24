//! Configuration for the verification service

use fl_shared::config::VerificationSettings;

use crate::domain::entities::verification_record::{
    CODE_LENGTH, DEFAULT_TTL_MINUTES, MAX_ATTEMPTS,
};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a verification code expires
    pub ttl_minutes: i64,
    /// Maximum number of verification attempts allowed
    pub max_attempts: u32,
    /// Minimum seconds between code requests for the same identifier
    pub rate_limit_window_seconds: u64,
    /// Number of digits in a generated code
    pub code_length: u32,
    /// Minutes between expired-record sweeps
    pub sweep_interval_minutes: u64,
    /// Timeout budget per delivery attempt in seconds
    pub send_timeout_seconds: u64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            rate_limit_window_seconds: 60,
            code_length: CODE_LENGTH as u32,
            sweep_interval_minutes: 5,
            send_timeout_seconds: 10,
        }
    }
}

impl From<VerificationSettings> for VerificationServiceConfig {
    fn from(settings: VerificationSettings) -> Self {
        Self {
            ttl_minutes: settings.ttl_minutes as i64,
            max_attempts: settings.max_attempts,
            rate_limit_window_seconds: settings.rate_limit_window_seconds,
            code_length: settings.code_length,
            sweep_interval_minutes: settings.sweep_interval_minutes,
            send_timeout_seconds: settings.send_timeout_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_entity_constants() {
        let config = VerificationServiceConfig::default();
        assert_eq!(config.ttl_minutes, DEFAULT_TTL_MINUTES);
        assert_eq!(config.max_attempts, MAX_ATTEMPTS);
        assert_eq!(config.code_length, CODE_LENGTH as u32);
        assert_eq!(config.rate_limit_window_seconds, 60);
        assert_eq!(config.sweep_interval_minutes, 5);
    }

    #[test]
    fn test_from_shared_settings() {
        let settings = VerificationSettings {
            ttl_minutes: 5,
            max_attempts: 4,
            rate_limit_window_seconds: 30,
            code_length: 8,
            sweep_interval_minutes: 2,
            send_timeout_seconds: 3,
        };

        let config = VerificationServiceConfig::from(settings);
        assert_eq!(config.ttl_minutes, 5);
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.rate_limit_window_seconds, 30);
        assert_eq!(config.code_length, 8);
        assert_eq!(config.sweep_interval_minutes, 2);
        assert_eq!(config.send_timeout_seconds, 3);
    }
}
