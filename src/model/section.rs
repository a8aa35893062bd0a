//! Section and ranking types.

use serde::{Deserialize, Serialize};

/// A contiguous run of a document opened by a boundary-style line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text that opened the section ("Introduction" for the implicit first one)
    pub title: String,
    /// 1-based page where the section starts
    pub start_page: u32,
    /// Body text, each line followed by a single space
    pub content: String,
}

impl Section {
    /// Create an empty section.
    pub fn new(title: impl Into<String>, start_page: u32) -> Self {
        Self {
            title: title.into(),
            start_page,
            content: String::new(),
        }
    }

    /// Whether any body text has been accumulated.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// A section tagged with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSection {
    /// Source file name
    pub document: String,
    /// The section itself
    pub section: Section,
}

impl DocumentSection {
    pub fn new(document: impl Into<String>, section: Section) -> Self {
        Self {
            document: document.into(),
            section,
        }
    }
}

/// A section's position in the relevance order. No score is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSection {
    pub document: String,
    #[serde(rename = "page_number")]
    pub page: u32,
    #[serde(rename = "section_title")]
    pub title: String,
    /// 1 = most relevant
    pub importance_rank: u32,
}

/// Truncated preview of the top-ranked section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    pub document: String,
    #[serde(rename = "page_number")]
    pub page: u32,
    pub refined_text: String,
}

/// Persona and task driving the relevance ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisQuery {
    pub persona_description: String,
    pub task_description: String,
}

impl AnalysisQuery {
    pub fn new(persona: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            persona_description: persona.into(),
            task_description: task.into(),
        }
    }

    /// The single string that gets embedded.
    pub fn query_text(&self) -> String {
        format!(
            "Persona: {}. Job: {}",
            self.persona_description, self.task_description
        )
    }
}
