//! `WorkArea` — the context shared by the parser, sorter and builder.
//!
//! The work area owns the input record, the word table and the output
//! record. Each stage takes it by `&mut` and runs to completion before the
//! next one starts, so there is exactly one writer at any time.
//!
//! A work area can also be exported to / imported from a flat `WorkImage`.
//! Importing validates every field so the stages can trust the table.

use crate::builder::output_len;
use crate::{
    build, parse, sort, ConstructionError, InputRecord, LayoutError, LayoutResult, OutputRecord,
    ParseSummary, WordRef, WordTable, WorkImage, MAX_LEN, MAX_WORDS, OUTPUT_CAPACITY,
};

/// Input, word table and output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkArea {
    pub(crate) input: InputRecord,
    pub(crate) words: WordTable<MAX_WORDS>,
    pub(crate) output: OutputRecord,
}

impl WorkArea {
    /// A zeroed work area with an empty input.
    pub const fn new() -> Self {
        Self {
            input: InputRecord::empty(),
            words: WordTable::new(),
            output: OutputRecord::empty(),
        }
    }

    /// A zeroed work area holding a copy of `bytes` as its input.
    ///
    /// # Errors
    /// Returns `ConstructionError::InputExceedsCapacity` if `bytes` is longer
    /// than `MAX_LEN`.
    pub fn with_input(bytes: &[u8]) -> Result<Self, ConstructionError> {
        Ok(Self {
            input: InputRecord::try_new(bytes)?,
            words: WordTable::new(),
            output: OutputRecord::empty(),
        })
    }

    /// Replace the input and zero the table and output for a new run.
    ///
    /// # Errors
    /// Returns `ConstructionError::InputExceedsCapacity` if `bytes` is longer
    /// than `MAX_LEN`; the work area is unchanged in that case.
    pub fn load_input(&mut self, bytes: &[u8]) -> Result<(), ConstructionError> {
        self.input.set(bytes)?;
        self.reset();
        Ok(())
    }

    /// Zero the word table and the output. The input is kept.
    pub fn reset(&mut self) {
        self.words.clear();
        self.output = OutputRecord::empty();
    }

    /// Run parser, sorter and builder in order.
    pub fn run(&mut self) -> ParseSummary {
        let summary = parse(self);
        sort(self);
        build(self);
        summary
    }

    #[inline(always)]
    pub fn input(&self) -> &InputRecord {
        &self.input
    }

    #[inline(always)]
    pub fn words(&self) -> &WordTable<MAX_WORDS> {
        &self.words
    }

    #[inline(always)]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    #[inline(always)]
    pub fn output(&self) -> &OutputRecord {
        &self.output
    }

    /// Length of the rebuilt record, terminator included. Zero until the
    /// builder has run.
    #[inline(always)]
    pub fn sorted_len(&self) -> usize {
        self.output.len()
    }

    /// The words in table order, as byte slices of the input.
    pub fn word_bytes(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let input = self.input.as_bytes();
        self.words.iter().map(move |w| w.bytes(input))
    }

    // ── Flat image import/export ──────────────────────────────────────

    /// Write the complete state, stale table slots included, into `image`.
    pub fn store_image(&self, image: &mut WorkImage) -> LayoutResult<()> {
        image.store_u8(WorkImage::CAPACITY, MAX_LEN as u8)?;
        image.store_u8(WorkImage::DECLARED_LENGTH, self.input.len() as u8)?;
        image.init_data(WorkImage::INPUT_DATA, self.input.raw())?;
        image.store_u16(WorkImage::WORD_COUNT, self.words.len() as u16)?;
        image.store_u16(WorkImage::SORTED_LENGTH, self.output.len() as u16)?;
        for (i, word) in self.words.slots().iter().enumerate() {
            image.store_u16(WorkImage::WORD_OFFSETS + i * 2, word.offset)?;
            image.store_u16(WorkImage::WORD_LENGTHS + i * 2, word.len)?;
        }
        image.init_data(WorkImage::OUTPUT_DATA, self.output.raw())?;
        Ok(())
    }

    /// Export into a fresh image.
    pub fn to_image(&self) -> LayoutResult<WorkImage> {
        let mut image = WorkImage::new();
        self.store_image(&mut image)?;
        Ok(image)
    }

    /// Rebuild a work area from `image`, validating every field.
    ///
    /// # Errors
    /// - `BadCapacity` if the capacity byte is not `MAX_LEN`
    /// - `DeclaredLengthExceedsCapacity` if the declared length is too large
    /// - `WordCountExceedsMax` if the word count is above `MAX_WORDS`
    /// - `WordOutOfRange` if a live word is not inside the declared input
    /// - `OutputExceedsCapacity` if the live words or the recorded sorted
    ///   length would not fit in the output record
    pub fn load_image(image: &WorkImage) -> LayoutResult<Self> {
        let capacity = image.load_u8(WorkImage::CAPACITY)?;
        if capacity as usize != MAX_LEN {
            return Err(LayoutError::BadCapacity { found: capacity });
        }
        let declared = image.load_u8(WorkImage::DECLARED_LENGTH)? as usize;
        if declared > MAX_LEN {
            return Err(LayoutError::DeclaredLengthExceedsCapacity {
                declared,
                capacity: MAX_LEN,
            });
        }
        let input = InputRecord::try_new(image.read_data(WorkImage::INPUT_DATA, declared)?)?;

        let count = image.load_u16(WorkImage::WORD_COUNT)? as usize;
        if count > MAX_WORDS {
            return Err(LayoutError::WordCountExceedsMax {
                count,
                max: MAX_WORDS,
            });
        }
        let mut slots = [WordRef::default(); MAX_WORDS];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = WordRef::new(
                image.load_u16(WorkImage::WORD_OFFSETS + i * 2)?,
                image.load_u16(WorkImage::WORD_LENGTHS + i * 2)?,
            );
        }
        if let Some((index, word)) = slots
            .iter()
            .take(count)
            .enumerate()
            .find(|(_, w)| w.end() > declared)
        {
            return Err(LayoutError::WordOutOfRange {
                index,
                offset: word.offset as usize,
                len: word.len as usize,
            });
        }
        let words = WordTable::from_slots(slots, count);

        let needed = output_len(words.as_slice());
        if needed > OUTPUT_CAPACITY {
            return Err(LayoutError::OutputExceedsCapacity {
                len: needed,
                capacity: OUTPUT_CAPACITY,
            });
        }
        let sorted_len = image.load_u16(WorkImage::SORTED_LENGTH)? as usize;
        if sorted_len > OUTPUT_CAPACITY {
            return Err(LayoutError::OutputExceedsCapacity {
                len: sorted_len,
                capacity: OUTPUT_CAPACITY,
            });
        }
        let mut output = OutputRecord::empty();
        output
            .raw_mut()
            .copy_from_slice(image.read_data(WorkImage::OUTPUT_DATA, OUTPUT_CAPACITY)?);
        output.set_len(sorted_len);

        Ok(Self {
            input,
            words,
            output,
        })
    }
}

impl Default for WorkArea {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the whole pipeline over a flat image in place.
///
/// The image is validated, processed and written back. The caller must have
/// zeroed the work fields (`WorkImage::clear_work_area`) since the previous
/// run, exactly as for a typed `WorkArea`.
pub fn run_image(image: &mut WorkImage) -> LayoutResult<ParseSummary> {
    let mut area = WorkArea::load_image(image)?;
    let summary = area.run();
    area.store_image(image)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_work_area_is_empty() {
        let area = WorkArea::new();
        assert!(area.input().is_empty());
        assert_eq!(area.word_count(), 0);
        assert_eq!(area.sorted_len(), 0);
    }

    #[test]
    fn run_executes_all_stages() {
        let mut area = WorkArea::with_input(b"zeta alpha beta alpha").unwrap();
        let summary = area.run();
        assert_eq!(summary.words, 4);
        assert_eq!(area.output().as_bytes(), b"alpha alpha beta zeta\r\n");
    }

    #[test]
    fn word_bytes_follow_table_order() {
        let mut area = WorkArea::with_input(b"b c a").unwrap();
        area.run();
        let mut words = area.word_bytes();
        assert_eq!(words.next(), Some(&b"a"[..]));
        assert_eq!(words.next(), Some(&b"b"[..]));
        assert_eq!(words.next(), Some(&b"c"[..]));
        assert_eq!(words.next(), None);
    }

    #[test]
    fn load_input_resets_previous_run() {
        let mut area = WorkArea::with_input(b"one two").unwrap();
        area.run();
        area.load_input(b"x").unwrap();
        assert_eq!(area.word_count(), 0);
        assert_eq!(area.sorted_len(), 0);
        area.run();
        assert_eq!(area.output().as_bytes(), b"x\r\n");
    }

    #[test]
    fn load_input_rejects_oversized() {
        let mut area = WorkArea::with_input(b"kept").unwrap();
        assert!(area.load_input(&[b'x'; MAX_LEN + 1]).is_err());
        assert_eq!(area.input().as_bytes(), b"kept");
    }

    #[test]
    fn image_roundtrip_preserves_state() {
        let mut area = WorkArea::with_input(b"delta gamma alpha").unwrap();
        area.run();
        let image = area.to_image().unwrap();
        assert_eq!(image.load_u16(WorkImage::WORD_COUNT), Ok(3));
        assert_eq!(image.load_u16(WorkImage::SORTED_LENGTH), Ok(19));
        let restored = WorkArea::load_image(&image).unwrap();
        assert_eq!(restored, area);
    }

    #[test]
    fn zeroed_image_loads_as_empty() {
        let image = WorkImage::new();
        let area = WorkArea::load_image(&image).unwrap();
        assert_eq!(area, WorkArea::new());
    }

    #[test]
    fn load_image_rejects_bad_capacity() {
        let mut image = WorkImage::new();
        image.store_u8(WorkImage::CAPACITY, 80).unwrap();
        assert_eq!(
            WorkArea::load_image(&image),
            Err(LayoutError::BadCapacity { found: 80 })
        );
    }

    #[test]
    fn load_image_rejects_long_declared_length() {
        let mut image = WorkImage::new();
        image.store_u8(WorkImage::DECLARED_LENGTH, 201).unwrap();
        assert_eq!(
            WorkArea::load_image(&image),
            Err(LayoutError::DeclaredLengthExceedsCapacity {
                declared: 201,
                capacity: MAX_LEN
            })
        );
    }

    #[test]
    fn load_image_rejects_excess_word_count() {
        let mut image = WorkImage::new();
        image.store_u16(WorkImage::WORD_COUNT, 101).unwrap();
        assert_eq!(
            WorkArea::load_image(&image),
            Err(LayoutError::WordCountExceedsMax {
                count: 101,
                max: MAX_WORDS
            })
        );
    }

    #[test]
    fn load_image_rejects_word_outside_input() {
        let mut image = WorkArea::with_input(b"abc").unwrap().to_image().unwrap();
        image.store_u16(WorkImage::WORD_COUNT, 1).unwrap();
        image.store_u16(WorkImage::WORD_OFFSETS, 2).unwrap();
        image.store_u16(WorkImage::WORD_LENGTHS, 2).unwrap();
        assert_eq!(
            WorkArea::load_image(&image),
            Err(LayoutError::WordOutOfRange {
                index: 0,
                offset: 2,
                len: 2
            })
        );
    }

    #[test]
    fn load_image_rejects_output_overflow() {
        let mut image = WorkArea::with_input(&[b'a'; MAX_LEN])
            .unwrap()
            .to_image()
            .unwrap();
        // Two references to the full 200-byte word: 403 output bytes.
        image.store_u16(WorkImage::WORD_COUNT, 2).unwrap();
        for i in 0..2 {
            image.store_u16(WorkImage::WORD_OFFSETS + i * 2, 0).unwrap();
            image
                .store_u16(WorkImage::WORD_LENGTHS + i * 2, MAX_LEN as u16)
                .unwrap();
        }
        assert_eq!(
            WorkArea::load_image(&image),
            Err(LayoutError::OutputExceedsCapacity {
                len: 403,
                capacity: OUTPUT_CAPACITY
            })
        );
    }

    #[test]
    fn stale_slots_beyond_count_are_ignored() {
        let mut image = WorkArea::with_input(b"ab").unwrap().to_image().unwrap();
        image.store_u16(WorkImage::WORD_OFFSETS + 10, 999).unwrap();
        let area = WorkArea::load_image(&image).unwrap();
        assert_eq!(area.word_count(), 0);
    }

    #[test]
    fn run_image_processes_in_place() {
        let mut image = WorkArea::with_input(b"hello").unwrap().to_image().unwrap();
        let summary = run_image(&mut image).unwrap();
        assert_eq!(summary.words, 1);
        assert_eq!(image.load_u16(WorkImage::SORTED_LENGTH), Ok(7));
        assert_eq!(
            image.read_data(WorkImage::OUTPUT_DATA, 7),
            Ok(&b"hello\r\n"[..])
        );
    }
}
