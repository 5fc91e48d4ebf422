//! Captured-output truncation policy
//!
//! The captured text is treated as an opaque buffer: the limit is in bytes
//! and a cut mid-line is expected. The only concession is that a cut never
//! splits a UTF-8 scalar, since the result must remain a valid string.

/// Clip `text` to at most `limit` bytes.
///
/// Returns the (possibly clipped) text and whether clipping occurred. With
/// no limit the text passes through untouched.
pub fn clip(text: &str, limit: Option<usize>) -> (String, bool) {
    let Some(limit) = limit else {
        return (text.to_string(), false);
    };

    if text.len() <= limit {
        return (text.to_string(), false);
    }

    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }

    (text[..end].to_string(), true)
}
