//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    ChannelDispatcher, ConsumeOutcome, DispatchResult, EmailSender,
    MemoryVerificationStore, RequestCodeResult, SmsSender, VerificationService,
    VerificationServiceConfig, VerificationStatus, VerificationStatusCallback,
    VerificationStore,
};
