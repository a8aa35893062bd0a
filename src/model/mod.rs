//! Data model shared by the parser, the outline pipeline, and the ranking
//! pipeline.
//!
//! The parser produces a [`Document`]: pages of text blocks, each block a
//! run of lines, each line a run of styled [`TextSpan`]s. The two pipelines
//! derive [`OutlineResult`]s and [`Section`]s from it.

mod document;
mod outline;
mod section;

pub use document::{Document, Page, TextBlock, TextLine, TextSpan};
pub use outline::{HeadingLevel, OutlineEntry, OutlineResult};
pub use section::{AnalysisQuery, DocumentSection, Excerpt, RankedSection, Section};

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// Idempotent: normalizing an already-normalized string returns it unchanged.
pub fn normalize_whitespace(text: &str) -> String {
    let re = WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("static pattern"));
    re.replace_all(text.trim(), " ").into_owned()
}

/// Round a font size to the nearest integer, ties to even.
///
/// 10.5pt lands in 10 and 11.5pt in 12.
pub fn round_font_size(size: f32) -> i32 {
    let floor = size.floor();
    let diff = size - floor;
    let rounded = if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded as i32
}
