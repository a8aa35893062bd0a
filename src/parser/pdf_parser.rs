//! PDF document parser using lopdf.

use std::path::Path;

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{Document, Page, TextSpan};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::{extract_page_spans, layout_page};
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    source_name: String,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let backend = LopdfBackend::load_file(path)?;
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            backend,
            source_name,
            options,
        })
    }

    /// Parse a PDF held in memory; `source_name` stands in for the file name.
    pub fn from_bytes(source_name: impl Into<String>, data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(source_name, data, ParseOptions::default())
    }

    /// Parse a PDF held in memory with custom options.
    pub fn from_bytes_with_options(
        source_name: impl Into<String>,
        data: &[u8],
        options: ParseOptions,
    ) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self {
            backend,
            source_name: source_name.into(),
            options,
        })
    }

    /// Parse the document into pages of blocks, lines and spans.
    pub fn parse(&self) -> Result<Document> {
        let pages = self.backend.pages();
        let mut raw_pages = Vec::with_capacity(pages.len());

        for (&number, &page_id) in &pages {
            match extract_page_spans(&self.backend, page_id) {
                Ok(spans) => raw_pages.push((number, spans)),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::TextExtract(format!("page {}: {}", number, e)));
                    }
                    // In lenient mode the page stays, without text.
                    log::warn!("{}: skipping page {}: {}", self.source_name, number, e);
                    raw_pages.push((number, Vec::new()));
                }
            }
        }

        let normalize = self.options.normalize_unicode;
        let build = |(number, spans): (u32, Vec<TextSpan>)| {
            layout_page(number, normalize_spans(spans, normalize))
        };
        let laid_out: Vec<Page> = if self.options.parallel {
            raw_pages.into_par_iter().map(build).collect()
        } else {
            raw_pages.into_iter().map(build).collect()
        };

        let mut document = Document::new(self.source_name.clone());
        for page in laid_out {
            document.add_page(page);
        }

        log::debug!(
            "{}: parsed {} pages, {} spans",
            self.source_name,
            document.page_count(),
            document.spans().count()
        );
        Ok(document)
    }

    /// File name the document was opened from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Get the page count.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }
}

fn normalize_spans(mut spans: Vec<TextSpan>, normalize: bool) -> Vec<TextSpan> {
    if normalize {
        for span in &mut spans {
            span.text = span.text.nfkc().collect();
        }
    }
    spans
}
