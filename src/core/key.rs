//! Step key sanitization

/// Strip every character that is not allowed in a pipeline step key.
///
/// Keys may only contain ASCII letters, digits, `_` and `-`. Anything else is
/// dropped rather than replaced, so the function is idempotent.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars().filter(|c| is_key_char(*c)).collect()
}

/// Whether `c` may appear in a step key
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
