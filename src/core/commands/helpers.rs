// src/core/commands/helpers.rs

//! Parsing helpers shared by command implementations.

use crate::core::DeckError;

/// Parses the leading integer of `text`: optional surrounding whitespace, an
/// optional sign, then digits. Anything after the digits is ignored, so
/// `"12abc"` is 12. Returns `None` when no digit follows the sign or the value
/// does not fit an `i64`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Like `parse_leading_int`, but reports failure as an invalid value.
pub fn require_int(key: &str, text: &str) -> Result<i64, DeckError> {
    parse_leading_int(text)
        .ok_or_else(|| DeckError::InvalidValue(format!("'{key}' is not an integer: '{text}'")))
}

/// Protocol booleans: exactly `"true"` is true, anything else is false.
pub fn parse_flag(text: &str) -> bool {
    text == "true"
}
