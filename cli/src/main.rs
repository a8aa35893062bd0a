//! pdfscope CLI - heading outlines and persona-driven section ranking

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfscope::embed::{Embedder, HashingEmbedder};
use pdfscope::pipeline::{discover_pdfs, AnalysisJob, BatchSummary, OutlineJob};
use pdfscope::render::JsonFormat;
use pdfscope::style::analyze_styles;
use pdfscope::{parse_file_with_options, HeuristicOptions, OutlineExtractor, ParseOptions};

const DEFAULT_INPUT: &str = "/app/input";
const DEFAULT_OUTPUT: &str = "/app/output";
const DEFAULT_MODEL: &str = "/app/model";

#[derive(Parser)]
#[command(name = "pdfscope")]
#[command(version)]
#[command(about = "Extract heading outlines and rank PDF sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title + heading outline JSON for every PDF in a directory
    Outline {
        /// Input directory
        #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Rank the sections of every PDF in a directory for a persona and task
    Analyze {
        /// Input directory
        #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Persona/job JSON file (default: <INPUT>/config.json)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Embedding model directory (model.onnx + tokenizer.json)
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_MODEL)]
        model: PathBuf,

        /// Excerpt length in characters
        #[arg(long, value_name = "N")]
        excerpt_chars: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show the style table and outline of a single PDF
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the outline as JSON instead of a tree
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by every processing command.
#[derive(Args, Clone)]
struct CommonArgs {
    /// Minimum occurrences for a non-bold heading style
    #[arg(long, value_name = "N")]
    min_occurrence: Option<usize>,

    /// Heading style candidates kept after ranking
    #[arg(long, value_name = "N")]
    max_candidates: Option<usize>,

    /// Word limit for section-boundary lines
    #[arg(long, value_name = "N")]
    max_heading_words: Option<usize>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Fail on unreadable pages instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Process documents one at a time
    #[arg(long)]
    sequential: bool,
}

impl CommonArgs {
    fn heuristics(&self) -> HeuristicOptions {
        let mut options = HeuristicOptions::new();
        if let Some(n) = self.min_occurrence {
            options = options.with_min_occurrence(n);
        }
        if let Some(n) = self.max_candidates {
            options = options.with_max_candidates(n);
        }
        if let Some(n) = self.max_heading_words {
            options = options.with_max_heading_words(n);
        }
        options
    }

    fn parse_options(&self) -> ParseOptions {
        let options = ParseOptions::new().with_parallel(!self.sequential);
        if self.strict {
            options
        } else {
            options.lenient()
        }
    }

    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            common,
        } => cmd_outline(&input, &output, &common),
        Commands::Analyze {
            input,
            output,
            config,
            model,
            excerpt_chars,
            common,
        } => cmd_analyze(
            &input,
            &output,
            config.as_deref(),
            &model,
            excerpt_chars,
            &common,
        ),
        Commands::Info {
            input,
            json,
            common,
        } => cmd_info(&input, json, &common),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "{} {} processed, {} failed",
        "Summary:".green().bold(),
        summary.processed.len(),
        summary.failed.len()
    );
    for (path, error) in &summary.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), error.dimmed());
    }
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let total = discover_pdfs(input)?.len();
    let job = OutlineJob::new(input, output)
        .with_parse_options(common.parse_options())
        .with_heuristics(common.heuristics())
        .with_format(common.format())
        .with_parallel(!common.sequential);

    let pb = progress_bar(total);
    pb.set_message("Extracting outlines...");
    let summary = job.run_with(|path, _| {
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!();
    print_summary(&summary);
    println!("{} {}", "Output:".green().bold(), output.display());
    Ok(())
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    model: &Path,
    excerpt_chars: Option<usize>,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut heuristics = common.heuristics();
    if let Some(n) = excerpt_chars {
        heuristics = heuristics.with_excerpt_chars(n);
    }

    let mut job = AnalysisJob::new(input, output)
        .with_parse_options(common.parse_options())
        .with_heuristics(heuristics)
        .with_format(common.format())
        .with_parallel(!common.sequential);
    if let Some(path) = config {
        job = job.with_config_path(path);
    }

    let embedder = load_embedder(model);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Ranking sections with {} embedder...", embedder.name()));
    let outcome = job.run(embedder.as_ref());
    pb.finish_and_clear();
    let outcome = outcome?;

    print_summary(&outcome.summary);
    println!(
        "{} {} sections ranked",
        "Analysis:".green().bold(),
        outcome.report.extracted_sections.len()
    );
    for section in outcome.report.extracted_sections.iter().take(5) {
        println!(
            "  {} {} {} (p{})",
            format!("#{}", section.importance_rank).cyan(),
            section.title,
            section.document.dimmed(),
            section.page
        );
    }
    println!("{} {}", "Output:".green().bold(), outcome.output_path.display());
    Ok(())
}

/// ONNX model when available, else the built-in hashing embedder.
fn load_embedder(model_dir: &Path) -> Box<dyn Embedder> {
    #[cfg(feature = "onnx")]
    {
        if model_dir.is_dir() {
            match pdfscope::embed::OnnxEmbedder::load(model_dir) {
                Ok(embedder) => return Box::new(embedder),
                Err(e) => log::warn!("cannot load model from {}: {}", model_dir.display(), e),
            }
        }
    }

    println!(
        "{} no embedding model loaded from {}, using hashing embedder",
        "Warning:".yellow().bold(),
        model_dir.display()
    );
    Box::new(HashingEmbedder::default())
}

fn cmd_info(
    input: &Path,
    json: bool,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, common.parse_options())?;
    let outline = OutlineExtractor::new(&common.heuristics()).extract(&doc);

    if json {
        let output = if common.compact {
            serde_json::to_string(&outline)?
        } else {
            serde_json::to_string_pretty(&outline)?
        };
        println!("{}", output);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Spans".bold(), doc.spans().count());

    println!();
    println!("{}", "Styles".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    let table = analyze_styles(&doc);
    let mut styles: Vec<_> = table.iter().collect();
    styles.sort_by(|a, b| b.0.cmp(a.0));
    for (style, count) in styles {
        println!("  {:<12} {}", style.to_string(), count);
    }

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Title".bold(), outline.title);
    for entry in &outline.outline {
        let indent = match entry.level {
            pdfscope::HeadingLevel::H1 => "",
            pdfscope::HeadingLevel::H2 => "  ",
            pdfscope::HeadingLevel::H3 => "    ",
        };
        println!(
            "  {}{} {} {}",
            indent,
            entry.level.to_string().yellow(),
            entry.text,
            format!("(p{})", entry.page).dimmed()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfscope".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outlines and section ranking");
}
