//! Word reference table — `(offset, length)` pairs into the input record.
//!
//! A word is never copied out of the input: the table only records where it
//! lives. The table uses a fixed-size backing array (const generic `MAX`)
//! plus a runtime count, so it stays `no_std` and allocation-free.

use crate::ConstructionError;

/// A reference to one word: its byte offset and length within the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WordRef {
    /// Byte offset of the first word character.
    pub offset: u16,
    /// Number of bytes in the word.
    pub len: u16,
}

impl WordRef {
    pub const fn new(offset: u16, len: u16) -> Self {
        Self { offset, len }
    }

    /// One past the last byte of the word.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }

    /// The referenced bytes within `input`.
    ///
    /// Every table built by the parser or validated by the image loader lies
    /// inside the input, so the empty fallback is never taken for those.
    #[inline(always)]
    pub fn bytes<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        input
            .get(self.offset as usize..self.end())
            .unwrap_or_default()
    }
}

/// Fixed-capacity table of word references.
///
/// Entries at or beyond `count` are stale: they keep whatever the slot held
/// before and are never visited by the stages.
#[derive(Clone)]
pub struct WordTable<const MAX: usize> {
    entries: [WordRef; MAX],
    count: usize,
}

impl<const MAX: usize> WordTable<MAX> {
    /// A zeroed table with no words.
    pub const fn new() -> Self {
        Self {
            entries: [WordRef::new(0, 0); MAX],
            count: 0,
        }
    }

    /// Number of words in the table.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        MAX
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.count >= MAX
    }

    /// Append a word reference.
    ///
    /// # Errors
    /// Returns `ConstructionError::TableFull` if the table already holds
    /// `MAX` words. The table is unchanged in that case.
    pub fn try_push(&mut self, word: WordRef) -> Result<(), ConstructionError> {
        match self.entries.get_mut(self.count) {
            Some(slot) => {
                *slot = word;
                self.count += 1;
                Ok(())
            }
            None => Err(ConstructionError::TableFull { max: MAX }),
        }
    }

    /// Word reference at rank `index`, if `index < len()`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<WordRef> {
        self.as_slice().get(index).copied()
    }

    /// The live entries, in rank order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[WordRef] {
        &self.entries[..self.count]
    }

    /// Mutable live entries. Only the sorter reorders them.
    #[inline(always)]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [WordRef] {
        &mut self.entries[..self.count]
    }

    pub fn iter(&self) -> core::slice::Iter<'_, WordRef> {
        self.as_slice().iter()
    }

    /// Set the count to zero without touching the slots.
    #[inline(always)]
    pub(crate) fn rewind(&mut self) {
        self.count = 0;
    }

    /// Zero every slot and the count.
    pub fn clear(&mut self) {
        self.entries.fill(WordRef::default());
        self.count = 0;
    }

    /// All `MAX` slots, stale ones included.
    #[inline(always)]
    pub(crate) fn slots(&self) -> &[WordRef; MAX] {
        &self.entries
    }

    /// Rebuild a table from raw slots. Callers guarantee `count <= MAX`.
    pub(crate) fn from_slots(entries: [WordRef; MAX], count: usize) -> Self {
        debug_assert!(count <= MAX);
        Self {
            entries,
            count: count.min(MAX),
        }
    }
}

impl<const MAX: usize> Default for WordTable<MAX> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tables compare by their live entries only.
impl<const MAX: usize> PartialEq for WordTable<MAX> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const MAX: usize> Eq for WordTable<MAX> {}

impl<const MAX: usize> core::fmt::Debug for WordTable<MAX> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a, const MAX: usize> IntoIterator for &'a WordTable<MAX> {
    type Item = &'a WordRef;
    type IntoIter = core::slice::Iter<'a, WordRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


// ── Kani Formal Verification Proofs ──────────────────────────────────────
//
// Run with: cargo kani -p wordsort-runtime

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Proof: the count never exceeds MAX, whatever sequence of pushes.
    #[kani::proof]
    #[kani::unwind(6)]
    fn push_respects_capacity() {
        let mut table = WordTable::<4>::new();
        let pushes: usize = kani::any();
        kani::assume(pushes <= 5);
        for _ in 0..pushes {
            let _ = table.try_push(WordRef::new(kani::any(), kani::any()));
        }
        kani::assert(table.len() <= 4, "count must not exceed MAX");
        kani::assert(table.as_slice().len() == table.len(), "slice matches count");
    }

    /// Proof: get never panics for any index.
    #[kani::proof]
    #[kani::unwind(1)]
    fn get_never_panics() {
        let table = WordTable::<4>::new();
        let index: usize = kani::any();
        kani::assert(table.get(index).is_none(), "empty table has no entries");
    }

    /// Proof: WordRef::bytes never panics and never exceeds the input.
    #[kani::proof]
    #[kani::unwind(1)]
    fn word_bytes_never_panics() {
        let input = [0u8; 8];
        let word = WordRef::new(kani::any(), kani::any());
        let bytes = word.bytes(&input);
        kani::assert(bytes.len() <= input.len(), "word stays inside input");
    }
}
