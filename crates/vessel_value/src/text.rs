//! Codepoint-level text primitives.
//!
//! Text is UTF-8 everywhere in Vessel. Hashing, key equality, the JSON writer
//! and the JSON parser only touch string contents through these functions,
//! so none of them care how many bytes a codepoint occupies. Lengths and
//! positions are byte offsets into the UTF-8 encoding.

use std::cmp::Ordering;

/// Decode the codepoint starting at byte offset `*pos` and move `*pos` past it.
///
/// Returns `None` at the end of `text`. `*pos` must sit on a char boundary.
#[inline]
pub fn next_codepoint(text: &str, pos: &mut usize) -> Option<char> {
    let c = text.get(*pos..)?.chars().next()?;
    *pos += c.len_utf8();
    Some(c)
}

/// Append one codepoint to a growing buffer.
#[inline]
pub fn push_codepoint(buf: &mut String, c: char) {
    buf.push(c);
}

/// Number of bytes `c` occupies once encoded.
#[inline]
pub const fn encoded_len(c: char) -> usize {
    c.len_utf8()
}

/// Encoded length of `text` in bytes.
#[inline]
pub fn length(text: &str) -> usize {
    text.len()
}

/// Owned duplicate of `text`.
#[inline]
pub fn duplicate(text: &str) -> String {
    text.to_owned()
}

/// Codepoint-order comparison. UTF-8 byte order coincides with codepoint
/// order, so this is a plain byte comparison.
#[inline]
pub fn compare(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}
