//! Flat work image — the byte-addressed layout of a `WorkArea`.
//!
//! Some callers hand the pipeline one contiguous, zero-initialised block of
//! memory rather than typed records. `WorkImage` is that block: a fixed
//! `[u8; WorkImage::SIZE]` array with bounds-checked little-endian access.
//!
//! ```text
//! offset  size  field
//!      0     1  input capacity (always MAX_LEN)
//!      1     1  declared input length
//!      2   200  input data
//!    202     2  word count         (u16 LE)
//!    204     2  sorted length      (u16 LE)
//!    206   200  word offsets       (100 x u16 LE)
//!    406   200  word lengths       (100 x u16 LE)
//!    606   202  output data
//! ```
//!
//! Load/store operations use the outline pattern: the public methods
//! delegate to non-generic inner functions that hold the single copy of the
//! bounds-checking logic.

use crate::{LayoutError, LayoutResult, MAX_LEN, MAX_WORDS, OUTPUT_CAPACITY};

/// Fixed byte image of the work area.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkImage {
    bytes: [u8; WorkImage::SIZE],
}

impl WorkImage {
    pub const CAPACITY: usize = 0;
    pub const DECLARED_LENGTH: usize = 1;
    pub const INPUT_DATA: usize = 2;
    pub const WORD_COUNT: usize = Self::INPUT_DATA + MAX_LEN;
    pub const SORTED_LENGTH: usize = Self::WORD_COUNT + 2;
    pub const WORD_OFFSETS: usize = Self::SORTED_LENGTH + 2;
    pub const WORD_LENGTHS: usize = Self::WORD_OFFSETS + MAX_WORDS * 2;
    pub const OUTPUT_DATA: usize = Self::WORD_LENGTHS + MAX_WORDS * 2;
    /// Total image size in bytes.
    pub const SIZE: usize = Self::OUTPUT_DATA + OUTPUT_CAPACITY;

    /// A zeroed image with the capacity byte set, ready for an input record.
    pub fn new() -> Self {
        let mut bytes = [0u8; Self::SIZE];
        bytes[Self::CAPACITY] = MAX_LEN as u8;
        Self { bytes }
    }

    /// Copy an image out of a caller-provided buffer.
    ///
    /// # Errors
    /// Returns `LayoutError::OutOfBounds` unless `bytes` is exactly
    /// `WorkImage::SIZE` long.
    pub fn try_from_bytes(bytes: &[u8]) -> LayoutResult<Self> {
        let bytes: [u8; Self::SIZE] = bytes.try_into().map_err(|_| LayoutError::OutOfBounds)?;
        Ok(Self { bytes })
    }

    /// Image size in bytes.
    #[inline(always)]
    pub const fn size(&self) -> usize {
        Self::SIZE
    }

    // ── Bounds-checked load/store ─────────────────────────────────────

    /// Load a byte.
    #[inline(always)]
    pub fn load_u8(&self, offset: usize) -> LayoutResult<u8> {
        load_u8_inner(&self.bytes, offset)
    }

    /// Load a little-endian u16.
    #[inline(always)]
    pub fn load_u16(&self, offset: usize) -> LayoutResult<u16> {
        load_u16_inner(&self.bytes, offset)
    }

    /// Store a byte.
    #[inline(always)]
    pub fn store_u8(&mut self, offset: usize, value: u8) -> LayoutResult<()> {
        store_u8_inner(&mut self.bytes, offset, value)
    }

    /// Store a little-endian u16.
    #[inline(always)]
    pub fn store_u16(&mut self, offset: usize, value: u16) -> LayoutResult<()> {
        store_u16_inner(&mut self.bytes, offset, value)
    }

    /// Copy `data` into the image starting at `offset`.
    ///
    /// # Errors
    /// Returns `Err(LayoutError::OutOfBounds)` if `offset + data.len()`
    /// exceeds the image.
    #[inline(always)]
    pub fn init_data(&mut self, offset: usize, data: &[u8]) -> LayoutResult<()> {
        init_data_inner(&mut self.bytes, offset, data)
    }

    /// Borrow `len` bytes starting at `offset`.
    #[inline(always)]
    pub fn read_data(&self, offset: usize, len: usize) -> LayoutResult<&[u8]> {
        checked_slice(&self.bytes, offset, len)
    }

    /// Zero the word table and output fields, keeping the input record.
    pub fn clear_work_area(&mut self) {
        self.bytes[Self::WORD_COUNT..].fill(0);
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for WorkImage {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for WorkImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkImage")
            .field("size", &Self::SIZE)
            .finish_non_exhaustive()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Bounds-check and return `memory[offset..offset+len]`.
/// Returns `Err(OutOfBounds)` on overflow or out-of-range — never panics.
#[inline(always)]
fn checked_slice(memory: &[u8], offset: usize, len: usize) -> LayoutResult<&[u8]> {
    let end = offset.checked_add(len).ok_or(LayoutError::OutOfBounds)?;
    memory.get(offset..end).ok_or(LayoutError::OutOfBounds)
}

#[inline(always)]
fn checked_slice_mut(memory: &mut [u8], offset: usize, len: usize) -> LayoutResult<&mut [u8]> {
    let end = offset.checked_add(len).ok_or(LayoutError::OutOfBounds)?;
    memory.get_mut(offset..end).ok_or(LayoutError::OutOfBounds)
}

#[inline(never)]
fn load_u8_inner(memory: &[u8], offset: usize) -> LayoutResult<u8> {
    memory.get(offset).copied().ok_or(LayoutError::OutOfBounds)
}

#[inline(never)]
fn load_u16_inner(memory: &[u8], offset: usize) -> LayoutResult<u16> {
    let s = checked_slice(memory, offset, 2)?;
    let bytes: [u8; 2] = s.try_into().map_err(|_| LayoutError::OutOfBounds)?;
    Ok(u16::from_le_bytes(bytes))
}

#[inline(never)]
fn store_u8_inner(memory: &mut [u8], offset: usize, value: u8) -> LayoutResult<()> {
    let slot = memory.get_mut(offset).ok_or(LayoutError::OutOfBounds)?;
    *slot = value;
    Ok(())
}

#[inline(never)]
fn store_u16_inner(memory: &mut [u8], offset: usize, value: u16) -> LayoutResult<()> {
    let s = checked_slice_mut(memory, offset, 2)?;
    s.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

#[inline(never)]
fn init_data_inner(memory: &mut [u8], offset: usize, data: &[u8]) -> LayoutResult<()> {
    let dst = checked_slice_mut(memory, offset, data.len())?;
    dst.copy_from_slice(data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_offsets() {
        assert_eq!(WorkImage::WORD_COUNT, 202);
        assert_eq!(WorkImage::SORTED_LENGTH, 204);
        assert_eq!(WorkImage::WORD_OFFSETS, 206);
        assert_eq!(WorkImage::WORD_LENGTHS, 406);
        assert_eq!(WorkImage::OUTPUT_DATA, 606);
        assert_eq!(WorkImage::SIZE, 808);
    }

    #[test]
    fn new_image_is_zeroed_except_capacity() {
        let image = WorkImage::new();
        assert_eq!(image.load_u8(WorkImage::CAPACITY), Ok(MAX_LEN as u8));
        assert!(image.as_slice()[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn store_load_u16_is_little_endian() {
        let mut image = WorkImage::new();
        image.store_u16(WorkImage::WORD_COUNT, 0x0102).unwrap();
        assert_eq!(image.load_u8(WorkImage::WORD_COUNT), Ok(0x02));
        assert_eq!(image.load_u8(WorkImage::WORD_COUNT + 1), Ok(0x01));
        assert_eq!(image.load_u16(WorkImage::WORD_COUNT), Ok(0x0102));
    }

    #[test]
    fn load_out_of_bounds() {
        let image = WorkImage::new();
        assert!(image.load_u8(WorkImage::SIZE - 1).is_ok());
        assert_eq!(image.load_u8(WorkImage::SIZE), Err(LayoutError::OutOfBounds));
        assert!(image.load_u16(WorkImage::SIZE - 2).is_ok());
        assert_eq!(
            image.load_u16(WorkImage::SIZE - 1),
            Err(LayoutError::OutOfBounds)
        );
        assert_eq!(image.load_u16(usize::MAX), Err(LayoutError::OutOfBounds));
    }

    #[test]
    fn store_out_of_bounds() {
        let mut image = WorkImage::new();
        assert_eq!(
            image.store_u16(WorkImage::SIZE - 1, 7),
            Err(LayoutError::OutOfBounds)
        );
        assert_eq!(
            image.store_u8(WorkImage::SIZE, 7),
            Err(LayoutError::OutOfBounds)
        );
    }

    #[test]
    fn init_data_and_read_back() {
        let mut image = WorkImage::new();
        image.init_data(WorkImage::INPUT_DATA, b"hello").unwrap();
        assert_eq!(image.read_data(WorkImage::INPUT_DATA, 5), Ok(&b"hello"[..]));
        assert_eq!(
            image.init_data(WorkImage::SIZE - 2, b"abc"),
            Err(LayoutError::OutOfBounds)
        );
        assert!(image.init_data(WorkImage::SIZE, &[]).is_ok());
    }

    #[test]
    fn clear_work_area_keeps_input() {
        let mut image = WorkImage::new();
        image.store_u8(WorkImage::DECLARED_LENGTH, 3).unwrap();
        image.init_data(WorkImage::INPUT_DATA, b"abc").unwrap();
        image.store_u16(WorkImage::WORD_COUNT, 1).unwrap();
        image.init_data(WorkImage::OUTPUT_DATA, b"abc\r\n").unwrap();
        image.clear_work_area();
        assert_eq!(image.read_data(WorkImage::INPUT_DATA, 3), Ok(&b"abc"[..]));
        assert_eq!(image.load_u16(WorkImage::WORD_COUNT), Ok(0));
        assert_eq!(image.load_u8(WorkImage::OUTPUT_DATA), Ok(0));
    }

    #[test]
    fn try_from_bytes_requires_exact_size() {
        let image = WorkImage::new();
        assert_eq!(WorkImage::try_from_bytes(image.as_slice()), Ok(image));
        assert_eq!(
            WorkImage::try_from_bytes(&[0u8; 10]),
            Err(LayoutError::OutOfBounds)
        );
    }
}

// ── Kani Formal Verification Proofs ──────────────────────────────────────

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Proof: load_u16 never panics and only succeeds inside the image.
    #[kani::proof]
    #[kani::unwind(1)]
    fn load_u16_never_panics() {
        let image = WorkImage::new();
        let offset: usize = kani::any();
        if image.load_u16(offset).is_ok() {
            kani::assert(offset + 2 <= WorkImage::SIZE, "load inside image");
        }
    }

    /// Proof: store followed by load returns the same value (u16).
    #[kani::proof]
    #[kani::unwind(1)]
    fn store_load_roundtrip_u16() {
        let mut image = WorkImage::new();
        let offset: usize = kani::any();
        let value: u16 = kani::any();
        if image.store_u16(offset, value).is_ok() {
            kani::assert(image.load_u16(offset) == Ok(value), "u16 roundtrip");
        }
    }
}
