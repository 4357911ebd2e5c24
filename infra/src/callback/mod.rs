//! Verification status callback implementations

pub mod null_callback;

// Re-export commonly used types
pub use null_callback::NullStatusCallback;
