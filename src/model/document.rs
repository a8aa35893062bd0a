//! Parsed document types: pages, blocks, lines, and spans.

use serde::{Deserialize, Serialize};

use super::{normalize_whitespace, round_font_size};

/// A run of characters sharing one font within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// X position (left edge)
    #[serde(default)]
    pub x: f32,
    /// Y position (baseline)
    #[serde(default)]
    pub y: f32,
    /// Estimated advance width
    #[serde(default)]
    pub width: f32,
}

impl TextSpan {
    /// Create a span without position information.
    pub fn new(text: impl Into<String>, font_size: f32, font_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_name: font_name.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
        }
    }

    /// Set the span position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the span width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Whether the font name contains "bold" (case-insensitive).
    pub fn is_bold(&self) -> bool {
        self.font_name.to_lowercase().contains("bold")
    }

    /// Font size rounded to whole points.
    pub fn rounded_size(&self) -> i32 {
        round_font_size(self.font_size)
    }
}

/// A text line composed of spans on the same baseline, left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// The spans in this line
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a line from spans (kept in the given order).
    pub fn from_spans(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// First span of the line; it determines the line's style.
    pub fn first_span(&self) -> Option<&TextSpan> {
        self.spans.first()
    }

    /// Baseline of the line (baseline of its first span).
    pub fn y(&self) -> f32 {
        self.spans.first().map(|s| s.y).unwrap_or(0.0)
    }

    /// Leftmost X position.
    pub fn x(&self) -> f32 {
        self.spans.first().map(|s| s.x).unwrap_or(0.0)
    }

    /// Largest font size on the line.
    pub fn max_font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }

    /// Span texts joined with single spaces, unnormalized.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Span texts joined and whitespace-normalized.
    pub fn normalized_text(&self) -> String {
        normalize_whitespace(&self.text())
    }

    /// Check if the line has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A group of vertically adjacent lines with uniform spacing and size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// The lines in this block
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Create a block from lines.
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }

    /// Line texts joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.text().trim().is_empty()
    }
}

/// A single page in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    /// Text blocks in reading order
    pub blocks: Vec<TextBlock>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Append a block.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Append a single-line block built from spans.
    pub fn add_line(&mut self, spans: Vec<TextSpan>) {
        self.blocks.push(TextBlock::new(vec![TextLine::from_spans(spans)]));
    }

    /// Lines of the page in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Spans of the page in reading order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.lines().flat_map(|l| l.spans.iter())
    }
}

/// A parsed document: the span stream of every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// File name of the source (e.g., "report.pdf")
    pub source_name: String,
    /// Pages in page order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document for the given source name.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// All spans in reading order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.pages.iter().flat_map(|p| p.spans())
    }

    /// All lines in reading order, paired with their 1-based page number.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &TextLine)> {
        self.pages
            .iter()
            .flat_map(|p| p.lines().map(move |l| (p.number, l)))
    }

    /// Raw text of the first block on the first page, blank or not.
    pub fn first_block_text(&self) -> Option<String> {
        self.pages.first()?.blocks.first().map(|b| b.text())
    }
}
