//! Verification-specific error types and error handling.
//!
//! Error messages are user-safe; the embedding API layer maps `code()`
//! values to localized phrasing where needed.

use thiserror::Error;

/// Errors surfaced by the verification service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Too many requests. Please try again in {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: i64 },

    #[error("No pending verification code found. Please request a new code")]
    NotFoundOrExpired,

    #[error("Verification code expired. Please request a new code")]
    Expired,

    #[error("Invalid verification code. {remaining_attempts} attempt(s) remaining")]
    CodeMismatch { remaining_attempts: u32 },

    #[error("Maximum verification attempts exceeded. Please request a new code")]
    AttemptsExceeded,

    #[error("Verification code delivery failed. Please try again later")]
    DispatchFailure,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl VerificationError {
    /// Stable error code for programmatic handling by the calling layer
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::RateLimited { .. } => "RATE_LIMITED",
            VerificationError::NotFoundOrExpired => "CODE_NOT_FOUND_OR_EXPIRED",
            VerificationError::Expired => "CODE_EXPIRED",
            VerificationError::CodeMismatch { .. } => "CODE_MISMATCH",
            VerificationError::AttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            VerificationError::DispatchFailure => "DISPATCH_FAILURE",
            VerificationError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;
