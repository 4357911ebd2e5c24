//! Domain entities representing core business objects.

pub mod verification_record;

// Re-export commonly used types
pub use verification_record::{
    Channel, Purpose, RecordKey, VerificationRecord,
    MAX_ATTEMPTS, CODE_LENGTH, DEFAULT_TTL_MINUTES
};
