//! Parser stage — splits the input record into word references.
//!
//! The scan is a two-state automaton over the declared input bytes:
//!
//! ```text
//!   Skipping --word byte--> InWord { start }
//!   InWord   --delimiter--> Skipping          (emit start..pos)
//!   end of input while InWord                 (emit start..len)
//! ```
//!
//! Words beyond `MAX_WORDS` are dropped. Dropping is not an error: the
//! returned `ParseSummary` only reports how many were lost.

use crate::{WordRef, WordTable, WorkArea};

/// Scanner state between two input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Between words.
    Skipping,
    /// Inside a word that started at `start`.
    InWord { start: usize },
}

/// What one parser run recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSummary {
    /// Words recorded in the table.
    pub words: usize,
    /// Words found after the table was full.
    pub dropped: usize,
}

impl ParseSummary {
    /// True if at least one word was dropped.
    #[inline]
    pub fn is_capped(&self) -> bool {
        self.dropped > 0
    }

    /// Total words seen in the input.
    #[inline]
    pub fn total(&self) -> usize {
        self.words + self.dropped
    }
}

/// Word delimiters: space, horizontal tab and carriage return. Every other
/// byte, LF and non-ASCII included, is a word character.
#[inline(always)]
pub fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r')
}

/// Tokenize the work area's input into its word table.
///
/// The table is refilled from rank 0. Slots past the new word count keep
/// their previous contents; the parser never zeroes them.
pub fn parse(area: &mut WorkArea) -> ParseSummary {
    let WorkArea { input, words, .. } = area;
    scan(input.as_bytes(), words)
}

#[inline(never)]
fn scan<const MAX: usize>(input: &[u8], words: &mut WordTable<MAX>) -> ParseSummary {
    let mut summary = ParseSummary::default();
    words.rewind();

    let mut state = ScanState::Skipping;
    for (pos, &byte) in input.iter().enumerate() {
        state = match (state, is_delimiter(byte)) {
            (ScanState::Skipping, true) => ScanState::Skipping,
            (ScanState::Skipping, false) => ScanState::InWord { start: pos },
            (ScanState::InWord { start }, true) => {
                emit(words, &mut summary, start, pos);
                ScanState::Skipping
            }
            (in_word, false) => in_word,
        };
    }
    if let ScanState::InWord { start } = state {
        emit(words, &mut summary, start, input.len());
    }
    summary
}

#[inline(always)]
fn emit<const MAX: usize>(
    words: &mut WordTable<MAX>,
    summary: &mut ParseSummary,
    start: usize,
    end: usize,
) {
    // Input is at most MAX_LEN bytes, so both values fit in u16.
    let word = WordRef::new(start as u16, (end - start) as u16);
    match words.try_push(word) {
        Ok(()) => summary.words += 1,
        Err(_) => summary.dropped += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_LEN, MAX_WORDS};

    fn parsed(text: &[u8]) -> (WorkArea, ParseSummary) {
        let mut area = WorkArea::with_input(text).unwrap();
        let summary = parse(&mut area);
        (area, summary)
    }

    #[test]
    fn delimiter_set() {
        assert!(is_delimiter(b' '));
        assert!(is_delimiter(b'\t'));
        assert!(is_delimiter(b'\r'));
        assert!(!is_delimiter(b'\n'));
        assert!(!is_delimiter(b'a'));
        assert!(!is_delimiter(0xC3));
        assert!(!is_delimiter(0));
    }

    #[test]
    fn empty_input_has_no_words() {
        let (area, summary) = parsed(b"");
        assert_eq!(area.word_count(), 0);
        assert_eq!(summary, ParseSummary::default());
    }

    #[test]
    fn only_delimiters_has_no_words() {
        let (area, summary) = parsed(b" \t \r");
        assert_eq!(area.word_count(), 0);
        assert_eq!(summary.words, 0);
    }

    #[test]
    fn single_word() {
        let (area, _) = parsed(b"hello");
        assert_eq!(area.words().as_slice(), &[WordRef::new(0, 5)]);
    }

    #[test]
    fn words_in_input_order() {
        let (area, summary) = parsed(b"zeta alpha beta alpha");
        assert_eq!(summary.words, 4);
        assert_eq!(
            area.words().as_slice(),
            &[
                WordRef::new(0, 4),
                WordRef::new(5, 5),
                WordRef::new(11, 4),
                WordRef::new(16, 5),
            ]
        );
    }

    #[test]
    fn leading_trailing_and_repeated_delimiters() {
        let (area, _) = parsed(b"  \tab \r\t cd\r");
        assert_eq!(
            area.words().as_slice(),
            &[WordRef::new(3, 2), WordRef::new(9, 2)]
        );
    }

    #[test]
    fn tab_and_space_separate_identically() {
        let (spaced, _) = parsed(b"a b");
        let (tabbed, _) = parsed(b"a\tb");
        assert_eq!(spaced.words(), tabbed.words());
    }

    #[test]
    fn line_feed_is_a_word_character() {
        let (area, _) = parsed(b"a\nb c");
        assert_eq!(
            area.words().as_slice(),
            &[WordRef::new(0, 3), WordRef::new(4, 1)]
        );
    }

    #[test]
    fn full_capacity_single_word() {
        let (area, _) = parsed(&[b'a'; MAX_LEN]);
        assert_eq!(area.words().as_slice(), &[WordRef::new(0, MAX_LEN as u16)]);
    }

    #[test]
    fn hundred_words_fill_the_table() {
        // Single-byte words at even positions: 100 words in 200 bytes, the
        // most a full record can hold.
        let mut text = [b' '; MAX_LEN];
        for byte in text.iter_mut().step_by(2) {
            *byte = b'a';
        }
        let (area, summary) = parsed(&text);
        assert_eq!(area.word_count(), MAX_WORDS);
        assert_eq!(summary.words, MAX_WORDS);
        assert!(!summary.is_capped());
    }

    #[test]
    fn words_beyond_capacity_are_dropped() {
        let mut words = WordTable::<4>::new();
        let summary = scan(b"a b c d e f", &mut words);
        assert_eq!(summary.words, 4);
        assert_eq!(summary.dropped, 2);
        assert_eq!(summary.total(), 6);
        assert!(summary.is_capped());
        assert_eq!(words.get(3), Some(WordRef::new(6, 1)));
    }

    #[test]
    fn reparse_refills_from_rank_zero() {
        let mut area = WorkArea::with_input(b"one two three").unwrap();
        parse(&mut area);
        assert_eq!(area.word_count(), 3);
        parse(&mut area);
        assert_eq!(area.word_count(), 3);
    }
}

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Proof: scanning any small input never panics, every word is non-empty
    /// and lies inside the input.
    #[kani::proof]
    #[kani::unwind(9)]
    fn scan_words_inside_input() {
        let input: [u8; 8] = kani::any();
        let len: usize = kani::any();
        kani::assume(len <= input.len());
        let mut words = WordTable::<4>::new();
        let summary = scan(&input[..len], &mut words);
        kani::assert(summary.words == words.len(), "summary matches table");
        for word in words.iter() {
            kani::assert(word.len > 0, "words are never empty");
            kani::assert(word.end() <= len, "words stay inside the input");
        }
    }
}
