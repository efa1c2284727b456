//! Shared helpers for the wordsort end-to-end tests and benches.

use wordsort_runtime::{build, is_delimiter, parse, sort, WorkArea, WorkImage, TERMINATOR};

/// Run all three stages over `input` in a fresh work area.
pub fn pipeline(input: &[u8]) -> WorkArea {
    let mut area = WorkArea::with_input(input).expect("test input fits the record");
    parse(&mut area);
    sort(&mut area);
    build(&mut area);
    area
}

/// A zeroed image holding `input`, as a loader would prepare it.
pub fn prepare_image(input: &[u8]) -> WorkImage {
    let mut image = WorkImage::new();
    image
        .store_u8(WorkImage::DECLARED_LENGTH, input.len() as u8)
        .expect("declared length slot");
    image
        .init_data(WorkImage::INPUT_DATA, input)
        .expect("test input fits the image");
    image
}

/// Apply one stage to an image: load, run the stage, store back.
pub fn run_stage(image: &mut WorkImage, stage: fn(&mut WorkArea)) {
    let mut area = WorkArea::load_image(image).expect("valid image");
    stage(&mut area);
    area.store_image(image).expect("image store");
}

/// Parser stage with the summary discarded, usable with `run_stage`.
pub fn parse_stage(area: &mut WorkArea) {
    parse(area);
}

/// Plain-Rust reference: split, sort, join, terminate.
pub fn sort_words_orig(input: &[u8]) -> Vec<u8> {
    let mut words: Vec<&[u8]> = input
        .split(|&b| is_delimiter(b))
        .filter(|w| !w.is_empty())
        .collect();
    words.sort_unstable();
    let mut out = words.join(&b' ');
    out.extend_from_slice(&TERMINATOR);
    out
}
