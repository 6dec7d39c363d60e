//! Helpful utilities for working with text.

/// Returns at most the first `max_chars` characters of `text`.
///
/// Characters are Unicode scalar values, not bytes, so multi-byte text is
/// never split in the middle of a character. Text that is already short
/// enough is returned unchanged.
///
/// # Examples
///
/// ```
/// use subscout::text::truncate;
/// assert_eq!(truncate("seating chart", 7), "seating");
/// assert_eq!(truncate("seating chart", 100), "seating chart");
/// assert_eq!(truncate("café au lait", 4), "café");
/// assert_eq!(truncate("", 4), "");
/// ```
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Collapses all runs of whitespace, including newlines, into single spaces.
///
/// # Examples
///
/// ```
/// use subscout::text::squash_whitespace;
/// assert_eq!(squash_whitespace("  line one\n\nline   two "), "line one line two");
/// ```
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
