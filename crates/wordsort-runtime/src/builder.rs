//! Builder stage — rebuilds the output record from the word table.
//!
//! Words are copied in rank order, separated by a single space, and the
//! record always ends with `TERMINATOR`. The builder does not check the
//! output capacity on its own: a table produced by the parser, or accepted
//! by `WorkArea::load_image`, always fits.

use crate::{WordRef, WorkArea, OUTPUT_CAPACITY, TERMINATOR};

/// Output length the builder will produce for `words`:
/// the word bytes, one separator between consecutive words, the terminator.
pub fn output_len(words: &[WordRef]) -> usize {
    let data: usize = words.iter().map(|w| w.len as usize).sum();
    data + words.len().saturating_sub(1) + TERMINATOR.len()
}

/// Write the sorted words into the work area's output record.
pub fn build(area: &mut WorkArea) {
    let WorkArea {
        input,
        words,
        output,
    } = area;
    let len = build_into(input.as_bytes(), words.as_slice(), output.raw_mut());
    output.set_len(len);
}

#[inline(never)]
fn build_into(input: &[u8], words: &[WordRef], out: &mut [u8; OUTPUT_CAPACITY]) -> usize {
    let mut cursor = 0;
    for (rank, word) in words.iter().enumerate() {
        if rank > 0 {
            cursor = put(out, cursor, b" ");
        }
        cursor = put(out, cursor, word.bytes(input));
    }
    cursor = put(out, cursor, &TERMINATOR);
    debug_assert!(cursor <= OUTPUT_CAPACITY);
    cursor.min(OUTPUT_CAPACITY)
}

/// Copy `bytes` at `cursor` and return the advanced cursor.
#[inline(always)]
fn put(out: &mut [u8], cursor: usize, bytes: &[u8]) -> usize {
    let end = cursor + bytes.len();
    if let Some(dst) = out.get_mut(cursor..end) {
        dst.copy_from_slice(bytes);
    }
    end
}


#[cfg(kani)]
mod proofs {
    use super::*;
    use crate::{parse, WorkArea};

    /// Proof: for any short input, the built record has the predicted length
    /// and ends with the terminator.
    #[kani::proof]
    #[kani::unwind(7)]
    fn build_matches_output_len() {
        let input: [u8; 6] = kani::any();
        let mut area = WorkArea::with_input(&input).unwrap();
        parse(&mut area);
        build(&mut area);
        let out = area.output().as_bytes();
        kani::assert(
            out.len() == output_len(area.words().as_slice()),
            "length matches formula",
        );
        kani::assert(out.ends_with(&TERMINATOR), "record ends with CR LF");
    }
}
