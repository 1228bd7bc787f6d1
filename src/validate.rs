//! Predicates over raw strings. None of these fail; invalid input is `false`.
use crate::sanitize::{sanitize_logon, sanitize_path};

/// `true` for exactly one alphabetic character, `A` through `Z` in either case.
pub fn is_valid_drive_letter(value: &str) -> bool {
    let mut chars = value.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}

/// `true` for strings of at least three characters that start with exactly two
/// backslashes, carry no surrounding whitespace, and hold no character that is
/// illegal in a Windows path.
pub fn is_valid_unc_path(value: &str) -> bool {
    value.chars().count() > 2
        && value.chars().take_while(|&c| c == '\\').count() == 2
        && value == value.trim()
        && value == sanitize_path(value)
}

/// `true` for non-empty logon names without surrounding whitespace or
/// characters Windows rejects in a logon.
pub fn is_valid_username(value: &str) -> bool {
    !value.is_empty() && value == value.trim() && value == sanitize_logon(value)
}
