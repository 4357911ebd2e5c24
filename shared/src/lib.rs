//! Shared utilities and common types for FundiLink server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Utility functions (identifier normalization, masking, etc.)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::VerificationSettings;
pub use utils::{identifier, mask};
