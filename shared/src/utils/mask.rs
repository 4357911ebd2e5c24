//! Privacy-preserving display forms for phone numbers and email addresses
//!
//! Masked values are for display and logging only. Storage keys always
//! use the raw normalized identifier.

/// Mask a phone number for display (e.g., +278******67)
///
/// Keeps the first 4 and last 2 characters visible and preserves the
/// total length. Numbers shorter than 8 characters are returned
/// unchanged since masking them would leave nothing meaningful.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 8 {
        return phone.to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", prefix, "*".repeat(chars.len() - 6), suffix)
}

/// Mask an email address for display (e.g., a***e@example.com)
///
/// Keeps the first and last character of the local part and the domain
/// unchanged. Local parts of 2 characters or fewer are returned as-is.
pub fn mask_email(email: &str) -> String {
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return email.to_string(),
    };
    let chars: Vec<char> = local.chars().collect();
    if chars.len() <= 2 {
        return email.to_string();
    }
    let first = chars[0];
    let last = chars[chars.len() - 1];
    format!("{}{}{}@{}", first, "*".repeat(chars.len() - 2), last, domain)
}
