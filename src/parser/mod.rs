//! PDF parsing module.

mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use layout::{
    extract_page_spans, group_lines_into_blocks, group_spans_into_lines, interpret_content,
    layout_page,
};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
