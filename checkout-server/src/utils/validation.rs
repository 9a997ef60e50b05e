//! Input validation helpers
//!
//! Semantic checks applied after serde has rejected malformed shapes and
//! before any database access.

/// Max cart lines per checkout request
pub const MAX_CART_LINES: usize = 100;

/// Check a phone number against E.164: `+` followed by 2-15 digits, no
/// leading zero.
pub fn is_valid_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    if !(2..=15).contains(&digits.len()) {
        return false;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    !digits.starts_with('0')
}
