//! Batch runs over a directory of generated PDFs.

mod common;

use std::fs;

use common::{cookbook, travel_guide, write_pdf};
use pdfscope::embed::HashingEmbedder;
use pdfscope::pipeline::{AnalysisJob, OutlineJob, ANALYSIS_OUTPUT_FILE, CONFIG_FILE};
use pdfscope::render::JsonFormat;
use pdfscope::{AnalysisConfig, OutlineResult};
use serde_json::Value;

const CONFIG: &str = r#"{
    "persona": {"description": "Pastry chef"},
    "job_to_be_done": {"task": "Whisk the cream until stiff"},
    "documents": [{"filename": "cookbook.pdf"}]
}"#;

#[test]
fn test_outline_job_writes_one_file_per_pdf() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_pdf(input.path(), "guide.pdf", &travel_guide());
    write_pdf(input.path(), "cookbook.pdf", &cookbook());
    fs::write(input.path().join("notes.txt"), "not a pdf").unwrap();

    let summary = OutlineJob::new(input.path(), output.path()).run().unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.total(), 2);
    assert!(summary.processed[0].ends_with("cookbook.pdf"));

    let json = fs::read_to_string(output.path().join("guide.json")).unwrap();
    let outline: OutlineResult = serde_json::from_str(&json).unwrap();
    assert_eq!(outline.title, "Travel Guide");
    assert_eq!(outline.outline.len(), 4);
    assert!(json.contains("\n    \"title\""));

    assert!(output.path().join("cookbook.json").exists());
    assert!(!output.path().join("notes.json").exists());
}

#[test]
fn test_outline_job_compact_sequential() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_pdf(input.path(), "cookbook.pdf", &cookbook());

    let summary = OutlineJob::new(input.path(), output.path())
        .with_format(JsonFormat::Compact)
        .with_parallel(false)
        .run()
        .unwrap();
    assert_eq!(summary.processed.len(), 1);

    let json = fs::read_to_string(output.path().join("cookbook.json")).unwrap();
    assert!(!json.contains('\n'));
    assert!(json.starts_with("{\"title\":\"Recipes\""));
}

#[test]
fn test_outline_job_reports_each_file() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_pdf(input.path(), "cookbook.pdf", &cookbook());
    fs::write(input.path().join("broken.pdf"), b"%PDF-1.4 truncated").unwrap();

    let seen = std::sync::Mutex::new(Vec::new());
    let summary = OutlineJob::new(input.path(), output.path())
        .run_with(|path, outcome| {
            seen.lock().unwrap().push((path.to_path_buf(), outcome.is_ok()));
        })
        .unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].0.ends_with("broken.pdf") && !seen[0].1);
    assert!(seen[1].0.ends_with("cookbook.pdf") && seen[1].1);
    assert_eq!(summary.failed.len(), 1);
}

#[test]
fn test_analysis_job_ranks_across_documents() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_pdf(input.path(), "guide.pdf", &travel_guide());
    write_pdf(input.path(), "cookbook.pdf", &cookbook());
    fs::write(input.path().join(CONFIG_FILE), CONFIG).unwrap();

    let outcome = AnalysisJob::new(input.path(), output.path())
        .run(&HashingEmbedder::default())
        .unwrap();
    assert_eq!(outcome.output_path, output.path().join(ANALYSIS_OUTPUT_FILE));

    let report: Value =
        serde_json::from_str(&fs::read_to_string(&outcome.output_path).unwrap()).unwrap();
    assert_eq!(
        report["metadata"]["input_documents"],
        serde_json::json!(["cookbook.pdf", "guide.pdf"])
    );
    assert_eq!(report["metadata"]["persona"], "Pastry chef");
    assert_eq!(
        report["metadata"]["job_to_be_done"],
        "Whisk the cream until stiff"
    );

    let sections = report["extracted_sections"].as_array().unwrap();
    assert_eq!(sections.len(), 3);
    let mut ranks: Vec<u64> = sections
        .iter()
        .map(|s| s["importance_rank"].as_u64().unwrap())
        .collect();
    ranks.sort();
    assert_eq!(ranks, vec![1, 2, 3]);

    assert_eq!(sections[0]["document"], "cookbook.pdf");
    assert_eq!(sections[0]["section_title"], "Desserts");
    assert_eq!(sections[0]["page_number"], 1);

    let excerpts = report["sub_section_analysis"].as_array().unwrap();
    assert_eq!(excerpts.len(), 1);
    assert_eq!(excerpts[0]["document"], "cookbook.pdf");
    assert_eq!(excerpts[0]["refined_text"], "Whisk the cream until stiff. ...");
}

#[test]
fn test_analysis_with_explicit_config_path() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("persona.json");
    fs::write(&config_path, CONFIG).unwrap();
    write_pdf(input.path(), "cookbook.pdf", &cookbook());

    let job = AnalysisJob::new(input.path(), output.path()).with_config_path(&config_path);
    assert_eq!(job.config_path(), config_path);

    let config = AnalysisConfig::load(&config_path).unwrap();
    let (report, summary) = job.analyze(&config, &HashingEmbedder::default()).unwrap();
    assert!(summary.is_success());
    assert_eq!(report.extracted_sections.len(), 2);
    assert_eq!(report.extracted_sections[0].importance_rank, 1);
    assert!(!output.path().join(ANALYSIS_OUTPUT_FILE).exists());
}
