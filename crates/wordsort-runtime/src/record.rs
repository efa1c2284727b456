//! Fixed-capacity input and output records.
//!
//! Both records own a fully pre-allocated backing array and track how much
//! of it is meaningful. Bytes past the declared length are unspecified and
//! never read by the stages.

use crate::{ConstructionError, MAX_LEN, OUTPUT_CAPACITY};

/// Input record: up to `MAX_LEN` raw bytes with an explicit declared length.
///
/// Read-only to every stage. The declared length can never exceed the
/// capacity; this is checked once, at construction.
#[derive(Clone)]
pub struct InputRecord {
    data: [u8; MAX_LEN],
    len: u8,
}

impl InputRecord {
    /// An empty record (declared length 0).
    pub const fn empty() -> Self {
        Self {
            data: [0u8; MAX_LEN],
            len: 0,
        }
    }

    /// Create a record holding a copy of `bytes`.
    ///
    /// # Errors
    /// Returns `ConstructionError::InputExceedsCapacity` if `bytes` is longer
    /// than `MAX_LEN`.
    pub fn try_new(bytes: &[u8]) -> Result<Self, ConstructionError> {
        let mut record = Self::empty();
        record.set(bytes)?;
        Ok(record)
    }

    /// Replace the record contents with `bytes`. Stale bytes past the new
    /// declared length are left untouched.
    ///
    /// # Errors
    /// Returns `ConstructionError::InputExceedsCapacity` if `bytes` is longer
    /// than `MAX_LEN`; the record is unchanged in that case.
    pub fn set(&mut self, bytes: &[u8]) -> Result<(), ConstructionError> {
        if bytes.len() > MAX_LEN {
            return Err(ConstructionError::InputExceedsCapacity {
                len: bytes.len(),
                capacity: MAX_LEN,
            });
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len() as u8;
        Ok(())
    }

    /// Record capacity in bytes.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        MAX_LEN
    }

    /// Declared length in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The declared bytes of the record.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// The full backing array, including bytes past the declared length.
    #[inline(always)]
    pub(crate) fn raw(&self) -> &[u8; MAX_LEN] {
        &self.data
    }
}

impl Default for InputRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// Records compare by their declared bytes only.
impl PartialEq for InputRecord {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for InputRecord {}

impl core::fmt::Debug for InputRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InputRecord")
            .field("len", &self.len)
            .field("data", &self.as_bytes())
            .finish()
    }
}

/// Output record: the rebuilt line, terminator included.
#[derive(Clone)]
pub struct OutputRecord {
    data: [u8; OUTPUT_CAPACITY],
    len: usize,
}

impl OutputRecord {
    /// An empty output record. Nothing has been built yet.
    pub const fn empty() -> Self {
        Self {
            data: [0u8; OUTPUT_CAPACITY],
            len: 0,
        }
    }

    /// Output length in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes written by the builder.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The full backing array, including bytes past the output length.
    #[inline(always)]
    pub(crate) fn raw(&self) -> &[u8; OUTPUT_CAPACITY] {
        &self.data
    }

    /// Mutable backing array for the builder and image loader.
    #[inline(always)]
    pub(crate) fn raw_mut(&mut self) -> &mut [u8; OUTPUT_CAPACITY] {
        &mut self.data
    }

    /// Set the output length. Callers guarantee `len <= OUTPUT_CAPACITY`.
    #[inline(always)]
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= OUTPUT_CAPACITY);
        self.len = len;
    }
}

impl Default for OutputRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for OutputRecord {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for OutputRecord {}

impl core::fmt::Debug for OutputRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OutputRecord")
            .field("len", &self.len)
            .field("data", &self.as_bytes())
            .finish()
    }
}
