//! Rendering of outline and analysis results to JSON.

mod json;
mod report;

pub use json::{to_json, write_json, JsonFormat};
pub use report::{format_timestamp, AnalysisMetadata, AnalysisReport, TIMESTAMP_FORMAT};
