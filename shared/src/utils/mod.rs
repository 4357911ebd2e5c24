//! Common utility functions

pub mod identifier;
pub mod mask;

// Re-export commonly used utilities
pub use identifier::*;
pub use mask::*;
