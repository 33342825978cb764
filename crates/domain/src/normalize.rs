//! Text normalization shared by the importer and the query engine
//!
//! Stored names and user input must go through the same functions so they
//! compare equal with plain string equality.

use crate::{errors::DomainError, value_objects::Direction};

/// Trim and collapse every whitespace run into a single space.
///
/// Whitespace-only input yields an empty string; callers reject that.
#[must_use]
pub fn normalize_stop_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Resolve a raw direction string to [`Direction`].
///
/// # Errors
///
/// Returns `DomainError::InvalidDirection` carrying the raw input when the
/// trimmed, uppercased value is neither `UP` nor `DOWN`.
pub fn normalize_direction(raw: &str) -> Result<Direction, DomainError> {
    Direction::parse(raw)
}

/// Case-folded key used to compare stop names the way the store does
///
/// Only ASCII letters are folded, matching SQLite's `NOCASE` collation and
/// `LIKE`; `"Ärzte"` and `"ärzte"` stay distinct.
#[must_use]
pub fn stop_name_key(normalized: &str) -> String {
    normalized.to_ascii_lowercase()
}
