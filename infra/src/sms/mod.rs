//! SMS Sender Module
//!
//! Sender implementations for the SMS delivery channel. Production
//! gateway integrations plug in here by implementing
//! `fl_core::services::verification::SmsSender`; the null sender covers
//! development and offline operation.

pub mod null_sms;

// Re-export commonly used types
pub use null_sms::NullSmsSender;
