//! Sorter stage — orders the word table by referenced content.
//!
//! Only the `(offset, length)` pairs move; the input bytes stay where they
//! are. The result is a permutation of the parser's table. Order among
//! words with identical bytes is unspecified.

use core::cmp::Ordering;

use crate::{WordRef, WorkArea};

/// Byte-wise lexicographic comparison of two words within `input`.
///
/// A strict prefix sorts before the longer word. Neither word is read past
/// its recorded length.
#[inline]
pub fn compare_words(input: &[u8], a: WordRef, b: WordRef) -> Ordering {
    a.bytes(input).cmp(b.bytes(input))
}

/// Reorder the work area's word table into non-decreasing order.
pub fn sort(area: &mut WorkArea) {
    let WorkArea { input, words, .. } = area;
    sort_refs(input.as_bytes(), words.as_mut_slice());
}

#[inline(never)]
fn sort_refs(input: &[u8], words: &mut [WordRef]) {
    if words.len() < 2 {
        return;
    }
    words.sort_unstable_by(|a, b| compare_words(input, *a, *b));
}
