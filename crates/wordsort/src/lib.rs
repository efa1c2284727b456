//! wordsort — sort the words of bounded text records.
//!
//! This crate drives the allocation-free pipeline from `wordsort-runtime`
//! over ordinary byte streams: every input line becomes one record whose
//! words are sorted and written back as a `CR LF` terminated line.

use std::io::{BufRead, Write};

pub use anyhow::{Context, Result};
use anyhow::bail;
use log::{debug, warn};
use wordsort_runtime::{ParseSummary, WorkArea, MAX_LEN};

/// What to do with a line longer than the input record capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongLinePolicy {
    /// Fail the record.
    #[default]
    Reject,
    /// Keep the first `MAX_LEN` bytes and drop the rest with a warning.
    Truncate,
}

/// Configuration options for a sorting run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Handling of lines longer than `MAX_LEN` bytes.
    pub long_lines: LongLinePolicy,
    /// Log and skip failing records instead of aborting the run.
    pub keep_going: bool,
}

/// One processed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedRecord {
    /// Sorted words, single-space separated, `CR LF` terminated.
    pub output: Vec<u8>,
    /// What the parser recorded for this record.
    pub summary: ParseSummary,
}

/// Totals for a whole stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Records written to the output.
    pub records: usize,
    /// Words written to the output.
    pub words: usize,
    /// Words dropped because a record exceeded the table capacity.
    pub dropped_words: usize,
    /// Records that failed and were skipped (only with `keep_going`).
    pub skipped: usize,
}

/// Sort the words of a single record.
///
/// # Errors
/// Fails if `input` is longer than `MAX_LEN` bytes and `options.long_lines`
/// is `LongLinePolicy::Reject`.
pub fn sort_record(input: &[u8], options: &PipelineOptions) -> Result<SortedRecord> {
    let mut area = WorkArea::new();
    let summary = sort_into(&mut area, input, options)?;
    Ok(SortedRecord {
        output: area.output().as_bytes().to_vec(),
        summary,
    })
}

/// Sort every `\n`-terminated line of `reader` and write the results to
/// `writer`, one `CR LF` terminated record per line.
///
/// The `\n` is stripped before sorting. A `\r` in front of it is a word
/// delimiter and therefore disappears from the output.
///
/// # Errors
/// I/O failures always abort. Record failures abort unless
/// `options.keep_going` is set, in which case they are logged and counted.
pub fn sort_lines<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    let mut area = WorkArea::new();
    let mut summary = RunSummary::default();
    let mut line = Vec::with_capacity(MAX_LEN + 2);
    let mut line_no = 0usize;

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .context("failed to read input")?;
        if n == 0 {
            break;
        }
        line_no += 1;
        if line.last() == Some(&b'\n') {
            line.pop();
        }

        let parsed = match sort_into(&mut area, &line, options) {
            Ok(parsed) => parsed,
            Err(e) if options.keep_going => {
                warn!("line {line_no}: skipped: {e:#}");
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.context(format!("line {line_no}"))),
        };

        writer
            .write_all(area.output().as_bytes())
            .context("failed to write output")?;
        summary.records += 1;
        summary.words += parsed.words;
        summary.dropped_words += parsed.dropped;
    }

    writer.flush().context("failed to flush output")?;
    Ok(summary)
}

/// Load `input` into `area` and run the pipeline.
fn sort_into(
    area: &mut WorkArea,
    input: &[u8],
    options: &PipelineOptions,
) -> Result<ParseSummary> {
    let input = match options.long_lines {
        LongLinePolicy::Truncate if input.len() > MAX_LEN => {
            warn!("truncating {}-byte record to {MAX_LEN} bytes", input.len());
            &input[..MAX_LEN]
        }
        _ => input,
    };
    if input.len() > MAX_LEN {
        bail!("record of {} bytes exceeds capacity {MAX_LEN}", input.len());
    }
    area.load_input(input).context("failed to load record into work area")?;

    let summary = area.run();
    debug!(
        "sorted {} words into {} bytes",
        summary.words,
        area.sorted_len()
    );
    if summary.is_capped() {
        warn!(
            "{} of {} words dropped (table holds {})",
            summary.dropped,
            summary.total(),
            summary.words
        );
    }
    Ok(summary)
}
