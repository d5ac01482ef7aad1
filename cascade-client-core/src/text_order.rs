//! String ordering matching the backend's UTF-8 byte order.
//!
//! The backend sorts strings by their UTF-8 encoding. Runtimes that keep
//! strings as UTF-16 code units have to reproduce that order with a
//! surrogate-aware scan: at the first differing unit, two surrogates or
//! two non-surrogates compare as plain integers, while a lone surrogate
//! sorts after the non-surrogate side (surrogate pairs encode code points
//! at or above U+10000, whose four-byte UTF-8 form is greater than any
//! one-to-three-byte form). Rust strings are already UTF-8, so the byte
//! order of the two strings *is* the order that scan produces.

use std::cmp::Ordering;

/// Compares two strings in the backend's sort order.
///
/// Equivalent to comparing the strings' UTF-8 bytes; when one string is
/// a prefix of the other, the shorter sorts first.
#[inline]
pub fn compare_utf8_order(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}
