//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `verification` - Verification code issuance and checking

pub mod verification;

// Re-export commonly used types
pub use verification::VerificationSettings;
