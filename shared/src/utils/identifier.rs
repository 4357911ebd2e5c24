//! Phone and email identifier utilities
//!
//! Normalization is applied before any matching, storage or masking so
//! that the same physical identifier always maps to the same key.

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").unwrap()
});

// Basic email shape: local part, @, domain with at least one dot
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Normalize an email address (trim whitespace, lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone(phone);
    PHONE_REGEX.is_match(&normalized)
}

/// Check if an email address is valid
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    EMAIL_REGEX.is_match(&normalized)
}
