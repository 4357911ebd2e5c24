//! # FundiLink Infrastructure Layer
//!
//! Concrete implementations of the delivery and callback capabilities
//! consumed by `fl_core`. The core stays free of provider specifics;
//! this crate supplies senders that plug into its traits.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **SMS**: Sender implementations for the SMS channel
//! - **Email**: Sender implementations for the email channel
//! - **Callback**: Verification status callback implementations
//!
//! Production gateway integrations (Twilio, SNS, SMTP relays) implement
//! the same `fl_core` traits and slot in beside the null senders.

// Re-export core error types for convenience
pub use fl_core::errors::*;

/// SMS sender module
pub mod sms;

/// Email sender module
pub mod email;

/// Verification status callback module
pub mod callback;

// Re-export the provided implementations
pub use callback::NullStatusCallback;
pub use email::NullEmailSender;
pub use sms::NullSmsSender;
