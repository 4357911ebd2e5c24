//! Verification service module for SMS and email one-time codes
//!
//! This module provides a complete verification code workflow including:
//! - Code generation and delivery with sender fallback
//! - Code verification with attempt tracking
//! - Send rate limiting per identifier and channel
//! - Periodic cleanup of expired codes

mod config;
mod dispatcher;
mod generator;
mod rate_limiter;
mod service;
mod store;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use dispatcher::{ChannelDispatcher, DispatchResult};
pub use generator::CodeGenerator;
pub use rate_limiter::SendRateLimiter;
pub use service::VerificationService;
pub use store::{ConsumeOutcome, MemoryVerificationStore, VerificationStore};
pub use sweeper::SweepTask;
pub use traits::{EmailSender, SmsSender, VerificationStatusCallback};
pub use types::{RequestCodeResult, VerificationStatus};
