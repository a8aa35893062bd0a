//! Title and heading outline extraction.
//!
//! ```
//! use pdfscope::model::{Document, HeadingLevel, Page, TextSpan};
//! use pdfscope::outline::OutlineExtractor;
//!
//! let mut page = Page::new(1);
//! page.add_line(vec![TextSpan::new("Title Here", 24.0, "Arial-Bold")]);
//! page.add_line(vec![TextSpan::new("Body text here.", 10.0, "Arial")]);
//! let mut doc = Document::new("one.pdf");
//! doc.add_page(page);
//!
//! let result = OutlineExtractor::default().extract(&doc);
//! assert_eq!(result.title, "Title Here");
//! assert_eq!(result.outline.len(), 1);
//! assert_eq!(result.outline[0].level, HeadingLevel::H1);
//! ```

use crate::config::HeuristicOptions;
use crate::model::{Document, OutlineEntry, OutlineResult};
use crate::style::{analyze_styles, classify, HeadingPolicy, HeadingStyleMap, StyleKey};

/// Runs style analysis, heading classification, and outline extraction.
pub struct OutlineExtractor {
    policy: Box<dyn HeadingPolicy + Send + Sync>,
}

impl OutlineExtractor {
    /// Extractor using the frequency/bold policy from `options`.
    pub fn new(options: &HeuristicOptions) -> Self {
        Self {
            policy: Box::new(options.heading_policy()),
        }
    }

    /// Extractor using a custom heading policy.
    pub fn with_policy<P>(policy: P) -> Self
    where
        P: HeadingPolicy + Send + Sync + 'static,
    {
        Self {
            policy: Box::new(policy),
        }
    }

    /// Extract the title and outline of a document.
    pub fn extract(&self, doc: &Document) -> OutlineResult {
        if doc.is_empty() {
            return OutlineResult::default();
        }

        let table = analyze_styles(doc);
        let classification = classify(&table, self.policy.as_ref());
        let result = extract_outline(doc, &classification.map);

        log::info!(
            "{}: {} headings across {} pages",
            doc.source_name,
            result.outline.len(),
            doc.page_count()
        );
        result
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new(&HeuristicOptions::default())
    }
}

/// Detect the title: first block of the first page, newlines collapsed.
///
/// Falls back to the source file name when the first page has no text.
pub fn detect_title(doc: &Document) -> String {
    match doc.first_block_text() {
        Some(text) => text.trim().replace('\n', " "),
        None => doc.source_name.clone(),
    }
}

/// Walk every line in reading order and keep those whose first span has a
/// heading style.
pub fn extract_outline(doc: &Document, map: &HeadingStyleMap) -> OutlineResult {
    if doc.is_empty() {
        return OutlineResult::default();
    }

    let mut outline = Vec::new();
    for (page, line) in doc.lines() {
        let Some(first) = line.first_span() else {
            continue;
        };
        let text = line.normalized_text();
        if text.is_empty() {
            continue;
        }
        if let Some(level) = map.level_of(&StyleKey::of(first)) {
            outline.push(OutlineEntry { level, text, page });
        }
    }

    OutlineResult {
        title: detect_title(doc),
        outline,
    }
}
