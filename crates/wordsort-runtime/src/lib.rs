//! `wordsort-runtime` — fixed-capacity work area and pipeline stages.
//!
//! This crate is `#![no_std]` and never allocates. It provides:
//! - `InputRecord` / `OutputRecord` — fixed-capacity byte records
//! - `WordTable<const MAX: usize>` — word references into the input
//! - `WorkArea` — the shared context the three stages operate on
//! - `WorkImage` — the flat, byte-addressed layout of a `WorkArea`
//! - `parse`, `sort`, `build` — the tokenize → sort → rebuild stages

#![no_std]

use core::fmt;

/// Capacity of the input record in bytes.
pub const MAX_LEN: usize = 200;

/// Maximum number of words the word table can hold. Further words are dropped.
pub const MAX_WORDS: usize = 100;

/// Line terminator appended to every output record.
pub const TERMINATOR: [u8; 2] = [b'\r', b'\n'];

/// Capacity of the output record: a full input plus the terminator.
pub const OUTPUT_CAPACITY: usize = MAX_LEN + TERMINATOR.len();

mod record;
pub use record::{InputRecord, OutputRecord};

mod table;
pub use table::{WordRef, WordTable};

mod image;
pub use image::WorkImage;

mod work_area;
pub use work_area::{run_image, WorkArea};

mod parser;
pub use parser::{is_delimiter, parse, ParseSummary};

mod sorter;
pub use sorter::{compare_words, sort};

mod builder;
pub use builder::{build, output_len};

/// Layout access and validation errors — returned when reading or writing a
/// `WorkImage`, never by the stages themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Access outside the image.
    OutOfBounds,
    /// The capacity byte of the input record is not `MAX_LEN`.
    BadCapacity { found: u8 },
    /// The declared input length is larger than the capacity.
    DeclaredLengthExceedsCapacity { declared: usize, capacity: usize },
    /// The word count field is larger than `MAX_WORDS`.
    WordCountExceedsMax { count: usize, max: usize },
    /// A word reference points outside the declared input.
    WordOutOfRange { index: usize, offset: usize, len: usize },
    /// The words would not fit into the output record once rebuilt.
    OutputExceedsCapacity { len: usize, capacity: usize },
}

/// Result type for layout operations — `Result<T, LayoutError>`.
pub type LayoutResult<T> = Result<T, LayoutError>;

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LayoutError::OutOfBounds => write!(f, "access outside the work image"),
            LayoutError::BadCapacity { found } => {
                write!(f, "input capacity byte is {found}, expected {MAX_LEN}")
            }
            LayoutError::DeclaredLengthExceedsCapacity { declared, capacity } => write!(
                f,
                "declared input length {declared} exceeds capacity {capacity}"
            ),
            LayoutError::WordCountExceedsMax { count, max } => {
                write!(f, "word count {count} exceeds maximum {max}")
            }
            LayoutError::WordOutOfRange { index, offset, len } => write!(
                f,
                "word {index} ({offset}+{len}) lies outside the declared input"
            ),
            LayoutError::OutputExceedsCapacity { len, capacity } => {
                write!(f, "output length {len} exceeds capacity {capacity}")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

/// Errors that occur while constructing records and tables.
///
/// These are caller errors: the stages themselves are total once a
/// `WorkArea` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionError {
    /// Input data is longer than the record capacity.
    InputExceedsCapacity { len: usize, capacity: usize },
    /// The word table is full.
    TableFull { max: usize },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConstructionError::InputExceedsCapacity { len, capacity } => {
                write!(f, "input of {len} bytes exceeds capacity {capacity}")
            }
            ConstructionError::TableFull { max } => write!(f, "word table full ({max} words)"),
        }
    }
}

impl core::error::Error for ConstructionError {}

impl From<ConstructionError> for LayoutError {
    fn from(e: ConstructionError) -> Self {
        match e {
            ConstructionError::InputExceedsCapacity { len, capacity } => {
                LayoutError::DeclaredLengthExceedsCapacity {
                    declared: len,
                    capacity,
                }
            }
            ConstructionError::TableFull { max } => LayoutError::WordCountExceedsMax {
                count: max + 1,
                max,
            },
        }
    }
}
