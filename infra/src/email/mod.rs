//! Email Sender Module
//!
//! Sender implementations for the email delivery channel, mirroring the
//! layout of the [`crate::sms`] module.

pub mod null_email;

// Re-export commonly used types
pub use null_email::NullEmailSender;
