//! Output documents of the ranking pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::model::{Excerpt, RankedSection};
use crate::rank::RankingResult;

/// Timestamp layout of `processing_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a UTC instant the way reports record it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Run metadata of an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// File names of the documents that contributed sections, in processing order
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

/// The aggregate ranking output (`analysis_output.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: AnalysisMetadata,
    pub extracted_sections: Vec<RankedSection>,
    pub sub_section_analysis: Vec<Excerpt>,
}

impl AnalysisReport {
    /// Assemble a report from a finished ranking.
    pub fn new(
        input_documents: Vec<String>,
        config: &AnalysisConfig,
        ranking: RankingResult,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: AnalysisMetadata {
                input_documents,
                persona: config.persona.clone(),
                job_to_be_done: config.job_to_be_done.clone(),
                processing_timestamp: format_timestamp(processed_at),
            },
            extracted_sections: ranking.ranked,
            sub_section_analysis: ranking.excerpts,
        }
    }
}
