//! # pdfscope
//!
//! Heading outlines and persona-driven section ranking for PDF documents.
//!
//! The library infers document structure purely from text styling: how
//! often each (font size, bold) style occurs tells body text apart from
//! headings. Two pipelines build on that:
//!
//! - **Outline**: title plus an H1/H2/H3 heading outline per document.
//! - **Analysis**: documents are split into sections at their largest font
//!   size, then every section is ranked against a persona and task by
//!   embedding similarity.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfscope::{extract_outline, render};
//!
//! fn main() -> pdfscope::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! Ranking sections across a directory:
//!
//! ```no_run
//! use pdfscope::embed::HashingEmbedder;
//! use pdfscope::pipeline::AnalysisJob;
//!
//! let outcome = AnalysisJob::new("input", "output")
//!     .run(&HashingEmbedder::default())?;
//! println!("top section: {:?}", outcome.report.extracted_sections.first());
//! # Ok::<(), pdfscope::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Style clustering**: one frequency table primitive for both pipelines
//! - **Pluggable heuristics**: [`style::HeadingPolicy`] and [`HeuristicOptions`]
//! - **Pluggable embeddings**: [`embed::Embedder`], with a deterministic
//!   hashing embedder built in and an ONNX embedder behind the `onnx` feature
//! - **Parallel processing**: uses Rayon for pages and batch runs

pub mod config;
pub mod detect;
pub mod embed;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod segment;
pub mod style;

// Re-export commonly used types
pub use config::{AnalysisConfig, HeuristicOptions};
pub use detect::{detect_format_from_bytes, detect_format_from_path, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    AnalysisQuery, Document, Excerpt, HeadingLevel, OutlineEntry, OutlineResult, RankedSection,
    Section,
};
pub use outline::OutlineExtractor;
pub use parser::{ParseOptions, PdfParser};
pub use rank::{RankingResult, RelevanceRanker};
pub use segment::SectionSegmenter;

use std::path::Path;

/// Parse a PDF file into pages of styled text.
///
/// # Example
///
/// ```no_run
/// use pdfscope::parse_file;
///
/// let doc = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfscope::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().sequential();
/// let doc = parse_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a PDF held in memory. `source_name` is used as the file name.
pub fn parse_bytes(source_name: &str, data: &[u8]) -> Result<Document> {
    let parser = PdfParser::from_bytes(source_name, data)?;
    parser.parse()
}

/// Extract the title and heading outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfscope::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p{})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    Pdfscope::new().parse(path).map(|r| r.outline())
}

/// Split a PDF file into sections.
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    Pdfscope::new().parse(path).map(|r| r.sections())
}

/// Builder for parsing and analyzing PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfscope::{HeuristicOptions, Pdfscope};
///
/// let parsed = Pdfscope::new()
///     .lenient()
///     .with_heuristics(HeuristicOptions::new().with_min_occurrence(2))
///     .parse("document.pdf")?;
/// let outline = parsed.outline();
/// let sections = parsed.sections();
/// # Ok::<(), pdfscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdfscope {
    parse_options: ParseOptions,
    heuristics: HeuristicOptions,
}

impl Pdfscope {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set heuristic thresholds.
    pub fn with_heuristics(mut self, heuristics: HeuristicOptions) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Parse a PDF file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<PdfscopeResult> {
        let parser = PdfParser::open_with_options(path, self.parse_options)?;
        Ok(PdfscopeResult {
            document: parser.parse()?,
            heuristics: self.heuristics,
        })
    }

    /// Parse a PDF from bytes.
    pub fn parse_bytes(self, source_name: &str, data: &[u8]) -> Result<PdfscopeResult> {
        let parser = PdfParser::from_bytes_with_options(source_name, data, self.parse_options)?;
        Ok(PdfscopeResult {
            document: parser.parse()?,
            heuristics: self.heuristics,
        })
    }

    /// Wrap an already parsed document.
    pub fn with_document(self, document: Document) -> PdfscopeResult {
        PdfscopeResult {
            document,
            heuristics: self.heuristics,
        }
    }
}

/// A parsed document plus the heuristics to analyze it with.
#[derive(Debug, Clone)]
pub struct PdfscopeResult {
    /// The parsed document
    pub document: Document,
    heuristics: HeuristicOptions,
}

impl PdfscopeResult {
    /// Title and heading outline.
    pub fn outline(&self) -> OutlineResult {
        OutlineExtractor::new(&self.heuristics).extract(&self.document)
    }

    /// Sections in reading order.
    pub fn sections(&self) -> Vec<Section> {
        SectionSegmenter::new(&self.heuristics).segment(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
