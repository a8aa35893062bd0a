//! Configuration: tunable heuristics and the persona/job input file.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::AnalysisQuery;
use crate::style::FrequencyBoldPolicy;

/// Thresholds used by the heading classifier, the segmenter, and the ranker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicOptions {
    /// Minimum occurrences for a non-bold style to count as a heading style
    pub min_occurrence: usize,

    /// Heading candidates kept after ranking (only the first three get levels)
    pub max_candidates: usize,

    /// A boundary-sized line with this many words or more is body text
    pub max_heading_words: usize,

    /// Characters of the top section kept in the excerpt
    pub excerpt_chars: usize,

    /// Appended to every excerpt
    pub excerpt_suffix: String,
}

impl HeuristicOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum occurrence threshold.
    pub fn with_min_occurrence(mut self, count: usize) -> Self {
        self.min_occurrence = count;
        self
    }

    /// Set the number of ranked heading candidates.
    pub fn with_max_candidates(mut self, count: usize) -> Self {
        self.max_candidates = count;
        self
    }

    /// Set the word-count guard for section boundaries.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the excerpt length in characters.
    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Heading policy built from these thresholds.
    pub fn heading_policy(&self) -> FrequencyBoldPolicy {
        FrequencyBoldPolicy::new(self.min_occurrence, self.max_candidates)
    }
}

impl Default for HeuristicOptions {
    fn default() -> Self {
        Self {
            min_occurrence: 3,
            max_candidates: 4,
            max_heading_words: 20,
            excerpt_chars: 500,
            excerpt_suffix: "...".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonaSpec {
    description: String,
}

#[derive(Debug, Deserialize)]
struct JobSpec {
    task: String,
}

#[derive(Debug, Deserialize)]
struct RawAnalysisConfig {
    persona: Option<PersonaSpec>,
    job_to_be_done: Option<JobSpec>,
}

/// Persona/job input of the ranking pipeline.
///
/// Expected shape: `{"persona": {"description": ...}, "job_to_be_done": {"task": ...}}`.
/// Other keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub persona: String,
    pub job_to_be_done: String,
}

impl AnalysisConfig {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawAnalysisConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;

        let persona = raw
            .persona
            .ok_or_else(|| Error::Config("missing key `persona.description`".to_string()))?;
        let job = raw
            .job_to_be_done
            .ok_or_else(|| Error::Config("missing key `job_to_be_done.task`".to_string()))?;

        Ok(Self {
            persona: persona.description,
            job_to_be_done: job.task,
        })
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Query handed to the relevance ranker.
    pub fn query(&self) -> AnalysisQuery {
        AnalysisQuery::new(self.persona.clone(), self.job_to_be_done.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_heuristics() {
        let options = HeuristicOptions::default();
        assert_eq!(options.min_occurrence, 3);
        assert_eq!(options.max_candidates, 4);
        assert_eq!(options.max_heading_words, 20);
        assert_eq!(options.excerpt_chars, 500);
        assert_eq!(options.excerpt_suffix, "...");
    }

    #[test]
    fn test_heuristics_builder() {
        let options = HeuristicOptions::new()
            .with_min_occurrence(5)
            .with_max_candidates(3)
            .with_max_heading_words(12)
            .with_excerpt_chars(100);
        assert_eq!(options.heading_policy(), FrequencyBoldPolicy::new(5, 3));
        assert_eq!(options.max_heading_words, 12);
        assert_eq!(options.excerpt_chars, 100);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "challenge_info": {"challenge_id": "round_1b_002"},
            "persona": {"description": "Travel Planner"},
            "job_to_be_done": {"task": "Plan a trip of 4 days for a group of 10 college friends."}
        }"#;
        let config = AnalysisConfig::from_json(json).unwrap();
        assert_eq!(config.persona, "Travel Planner");
        assert_eq!(
            config.query().query_text(),
            "Persona: Travel Planner. Job: Plan a trip of 4 days for a group of 10 college friends."
        );
    }

    #[test]
    fn test_config_missing_persona() {
        let json = r#"{"job_to_be_done": {"task": "x"}}"#;
        let err = AnalysisConfig::from_json(json).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("persona.description"));
    }

    #[test]
    fn test_config_missing_task() {
        let json = r#"{"persona": {"description": "x"}, "job_to_be_done": {}}"#;
        assert!(matches!(
            AnalysisConfig::from_json(json),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_malformed() {
        assert!(matches!(
            AnalysisConfig::from_json("not json"),
            Err(Error::Config(_))
        ));
    }
}
