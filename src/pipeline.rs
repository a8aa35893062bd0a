//! Batch runners over an input directory.
//!
//! [`OutlineJob`] writes one `<stem>.json` outline per PDF. [`AnalysisJob`]
//! segments every PDF, ranks all sections together against the configured
//! persona and task, and writes a single `analysis_output.json`. In both, a
//! document that fails to parse is logged and recorded in the
//! [`BatchSummary`] without stopping the run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;

use crate::config::{AnalysisConfig, HeuristicOptions};
use crate::detect::has_pdf_extension;
use crate::embed::Embedder;
use crate::error::Result;
use crate::model::{Document, DocumentSection, OutlineResult};
use crate::outline::OutlineExtractor;
use crate::parser::{ParseOptions, PdfParser};
use crate::rank::RelevanceRanker;
use crate::render::{write_json, AnalysisReport, JsonFormat};
use crate::segment::SectionSegmenter;

/// File name of the aggregate ranking output.
pub const ANALYSIS_OUTPUT_FILE: &str = "analysis_output.json";

/// Default persona/job file name inside the input directory.
pub const CONFIG_FILE: &str = "config.json";

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Inputs handled successfully, in input order
    pub processed: Vec<PathBuf>,
    /// Inputs that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    /// Total number of inputs seen.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Whether every input succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record<T>(&mut self, path: PathBuf, outcome: &Result<T>) {
        match outcome {
            Ok(_) => self.processed.push(path),
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                self.failed.push((path, e.to_string()));
            }
        }
    }
}

/// Regular files with a `.pdf` extension in `dir`, sorted by file name.
pub fn discover_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// File name of `path` as a string, for reports.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Outline output path for an input PDF: `<output_dir>/<stem>.json`.
pub fn outline_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Outline extraction over every PDF in a directory.
#[derive(Debug, Clone)]
pub struct OutlineJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub parse_options: ParseOptions,
    pub heuristics: HeuristicOptions,
    pub format: JsonFormat,
    /// Process documents on the rayon pool
    pub parallel: bool,
}

impl OutlineJob {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            parse_options: ParseOptions::default(),
            heuristics: HeuristicOptions::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    pub fn with_heuristics(mut self, heuristics: HeuristicOptions) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process every PDF in the input directory.
    pub fn run(&self) -> Result<BatchSummary> {
        self.run_with(|_, _| {})
    }

    /// Like [`OutlineJob::run`], calling `on_done` after each document.
    pub fn run_with<F>(&self, on_done: F) -> Result<BatchSummary>
    where
        F: Fn(&Path, &Result<PathBuf>) + Sync,
    {
        fs::create_dir_all(&self.output_dir)?;
        let inputs = discover_pdfs(&self.input_dir)?;
        log::info!(
            "extracting outlines for {} documents from {}",
            inputs.len(),
            self.input_dir.display()
        );

        let extractor = OutlineExtractor::new(&self.heuristics);
        let process = |path: &PathBuf| {
            let outcome = self.process_file(path, &extractor);
            on_done(path, &outcome);
            outcome
        };
        let outcomes: Vec<Result<PathBuf>> = if self.parallel {
            inputs.par_iter().map(process).collect()
        } else {
            inputs.iter().map(process).collect()
        };

        let mut summary = BatchSummary::default();
        for (path, outcome) in inputs.into_iter().zip(outcomes) {
            summary.record(path, &outcome);
        }
        Ok(summary)
    }

    /// Extract and write the outline of one PDF; returns the output path.
    pub fn process_file(&self, path: &Path, extractor: &OutlineExtractor) -> Result<PathBuf> {
        let result = self.extract(path, extractor)?;
        let output = outline_output_path(&self.output_dir, path);
        write_json(&result, &output, self.format)?;
        Ok(output)
    }

    fn extract(&self, path: &Path, extractor: &OutlineExtractor) -> Result<OutlineResult> {
        let doc = PdfParser::open_with_options(path, self.parse_options.clone())?.parse()?;
        Ok(extractor.extract(&doc))
    }
}

/// Result of an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub summary: BatchSummary,
    pub output_path: PathBuf,
}

/// Persona-driven section ranking over every PDF in a directory.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Persona/job file; `<input_dir>/config.json` when unset
    pub config_path: Option<PathBuf>,
    pub parse_options: ParseOptions,
    pub heuristics: HeuristicOptions,
    pub format: JsonFormat,
    /// Parse documents on the rayon pool
    pub parallel: bool,
}

impl AnalysisJob {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            config_path: None,
            parse_options: ParseOptions::default(),
            heuristics: HeuristicOptions::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    pub fn with_heuristics(mut self, heuristics: HeuristicOptions) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Effective persona/job file path.
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.input_dir.join(CONFIG_FILE))
    }

    /// Rank all sections and write `analysis_output.json`.
    ///
    /// A missing or malformed config aborts the run before any document is
    /// read; unreadable documents are skipped.
    pub fn run(&self, embedder: &dyn Embedder) -> Result<AnalysisOutcome> {
        let config = AnalysisConfig::load(self.config_path())?;
        let (report, summary) = self.analyze(&config, embedder)?;

        let output_path = self.output_dir.join(ANALYSIS_OUTPUT_FILE);
        write_json(&report, &output_path, self.format)?;
        log::info!(
            "ranked {} sections from {} documents into {}",
            report.extracted_sections.len(),
            summary.processed.len(),
            output_path.display()
        );

        Ok(AnalysisOutcome {
            report,
            summary,
            output_path,
        })
    }

    /// Rank all sections without writing anything.
    pub fn analyze(
        &self,
        config: &AnalysisConfig,
        embedder: &dyn Embedder,
    ) -> Result<(AnalysisReport, BatchSummary)> {
        let inputs = discover_pdfs(&self.input_dir)?;
        log::info!(
            "analyzing {} documents for persona {:?}",
            inputs.len(),
            config.persona
        );

        let parse = |path: &PathBuf| -> Result<Document> {
            PdfParser::open_with_options(path, self.parse_options.clone())?.parse()
        };
        let parsed: Vec<Result<Document>> = if self.parallel {
            inputs.par_iter().map(parse).collect()
        } else {
            inputs.iter().map(parse).collect()
        };

        let segmenter = SectionSegmenter::new(&self.heuristics);
        let mut summary = BatchSummary::default();
        let mut input_documents = Vec::new();
        let mut sections = Vec::new();

        for (path, outcome) in inputs.into_iter().zip(parsed) {
            summary.record(path.clone(), &outcome);
            if let Ok(doc) = outcome {
                let name = file_name(&path);
                sections.extend(
                    segmenter
                        .segment(&doc)
                        .into_iter()
                        .map(|s| DocumentSection::new(name.clone(), s)),
                );
                input_documents.push(name);
            }
        }

        let ranker = RelevanceRanker::new(embedder, &self.heuristics);
        let ranking = ranker.rank(&config.query(), &sections)?;
        let report = AnalysisReport::new(input_documents, config, ranking, Utc::now());
        Ok((report, summary))
    }
}
