//! Section segmentation.
//!
//! A document is split wherever a short line set in the largest font size
//! appears. Everything else accumulates as body text of the current section.

use crate::config::HeuristicOptions;
use crate::model::{Document, Section};
use crate::style::{size_key, StyleTable};

/// Title of the implicit section that starts every document.
pub const DEFAULT_SECTION_TITLE: &str = "Introduction";

/// Splits documents into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSegmenter {
    max_heading_words: usize,
}

impl SectionSegmenter {
    /// Segmenter with the word-count guard from `options`.
    pub fn new(options: &HeuristicOptions) -> Self {
        Self {
            max_heading_words: options.max_heading_words,
        }
    }

    /// Boundary size: the largest rounded font size present in the document.
    pub fn boundary_size(doc: &Document) -> Option<i32> {
        StyleTable::from_document(doc, size_key).max_key()
    }

    /// Split `doc` into sections in reading order.
    pub fn segment(&self, doc: &Document) -> Vec<Section> {
        let boundary = Self::boundary_size(doc);
        log::debug!("{}: boundary size {:?}", doc.source_name, boundary);

        let mut sections = Vec::new();
        let mut current = Section::new(DEFAULT_SECTION_TITLE, 1);
        let mut heading_seen = false;

        for (page, line) in doc.lines() {
            let Some(first) = line.first_span() else {
                continue;
            };
            let text = line.normalized_text();
            let is_boundary = Some(first.rounded_size()) == boundary
                && text.split_whitespace().count() < self.max_heading_words;

            if is_boundary {
                heading_seen = true;
                if current.has_content() {
                    sections.push(std::mem::replace(&mut current, Section::new(text, page)));
                } else {
                    current.title = text;
                    current.start_page = page;
                }
            } else {
                current.content.push_str(&text);
                current.content.push(' ');
            }
        }

        // A heading with no body is kept only when nothing else was produced.
        if current.has_content() || (sections.is_empty() && heading_seen) {
            sections.push(current);
        }

        log::debug!("{}: {} sections", doc.source_name, sections.len());
        sections
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new(&HeuristicOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Page, TextSpan};

    fn line(page: &mut Page, text: &str, size: f32) {
        page.add_line(vec![TextSpan::new(text, size, "Arial")]);
    }

    #[test]
    fn test_sections_split_on_largest_size() {
        let mut doc = Document::new("guide.pdf");
        let mut p1 = Page::new(1);
        line(&mut p1, "Preface text.", 10.0);
        line(&mut p1, "Cities", 16.0);
        line(&mut p1, "Nice is lovely.", 10.0);
        doc.add_page(p1);
        let mut p2 = Page::new(2);
        line(&mut p2, "Food", 16.0);
        line(&mut p2, "Try the   socca.", 10.0);
        line(&mut p2, "And the tapenade.", 10.0);
        doc.add_page(p2);

        let sections = SectionSegmenter::default().segment(&doc);
        assert_eq!(
            sections,
            vec![
                Section {
                    title: "Introduction".to_string(),
                    start_page: 1,
                    content: "Preface text. ".to_string(),
                },
                Section {
                    title: "Cities".to_string(),
                    start_page: 1,
                    content: "Nice is lovely. ".to_string(),
                },
                Section {
                    title: "Food".to_string(),
                    start_page: 2,
                    content: "Try the socca. And the tapenade. ".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_leading_heading_replaces_empty_introduction() {
        let mut doc = Document::new("a.pdf");
        let mut p1 = Page::new(1);
        line(&mut p1, "Guide Title", 20.0);
        line(&mut p1, "Chapter", 20.0);
        line(&mut p1, "Body.", 10.0);
        doc.add_page(p1);

        let sections = SectionSegmenter::default().segment(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Chapter");
        assert_eq!(sections[0].content, "Body. ");
    }

    #[test]
    fn test_long_boundary_line_is_body() {
        let words = vec!["word"; 25].join(" ");
        let mut doc = Document::new("a.pdf");
        let mut p1 = Page::new(1);
        line(&mut p1, &words, 14.0);
        line(&mut p1, "small print", 9.0);
        doc.add_page(p1);

        let sections = SectionSegmenter::default().segment(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].content, format!("{} small print ", words));
    }

    #[test]
    fn test_word_guard_is_tunable() {
        let mut doc = Document::new("a.pdf");
        let mut p1 = Page::new(1);
        line(&mut p1, "A fairly long heading line", 14.0);
        line(&mut p1, "body", 9.0);
        doc.add_page(p1);

        let strict = SectionSegmenter::new(&HeuristicOptions::new().with_max_heading_words(3));
        assert_eq!(strict.segment(&doc)[0].title, "Introduction");
        assert_eq!(
            SectionSegmenter::default().segment(&doc)[0].title,
            "A fairly long heading line"
        );
    }

    #[test]
    fn test_trailing_empty_section_dropped() {
        let mut doc = Document::new("a.pdf");
        let mut p1 = Page::new(1);
        line(&mut p1, "Body.", 10.0);
        line(&mut p1, "Appendix", 14.0);
        doc.add_page(p1);

        let sections = SectionSegmenter::default().segment(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Introduction");
    }

    #[test]
    fn test_heading_only_document_keeps_single_section() {
        let mut doc = Document::new("a.pdf");
        let mut p1 = Page::new(1);
        line(&mut p1, "Cover", 30.0);
        doc.add_page(p1);

        let sections = SectionSegmenter::default().segment(&doc);
        assert_eq!(sections, vec![Section::new("Cover", 1)]);
    }

    #[test]
    fn test_spanless_line_is_skipped() {
        let mut doc = Document::new("a.pdf");
        let mut p1 = Page::new(1);
        p1.add_line(vec![]);
        line(&mut p1, "Chapter", 20.0);
        line(&mut p1, "Body.", 10.0);
        doc.add_page(p1);

        let sections = SectionSegmenter::default().segment(&doc);
        assert_eq!(
            sections,
            vec![Section {
                title: "Chapter".to_string(),
                start_page: 1,
                content: "Body. ".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        assert!(SectionSegmenter::default()
            .segment(&Document::new("a.pdf"))
            .is_empty());
        assert_eq!(SectionSegmenter::boundary_size(&Document::new("a.pdf")), None);
    }
}
