//! # FundiLink Core
//!
//! Core business logic and domain layer for the FundiLink backend.
//! This crate contains the domain entities, the verification code
//! service, and the error types that form the foundation of the
//! application architecture.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
