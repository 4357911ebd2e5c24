//! Tests for the verification service and its collaborators






#[cfg(test)]
mod service_tests;
