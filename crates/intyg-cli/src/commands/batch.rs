//! Batch command - extract many certificates of one kind in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use intyg_core::{CertificateExtractor, CertificateKind, ExtractionResult};

use super::extract::{format_result, OutputFormat};
use super::{load_config, output_path, parse_kind, read_input};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for `.txt` and `.json` OCR files
    #[arg(required = true)]
    input: String,

    /// Certificate kind shared by all files
    #[arg(short, long, value_parser = parse_kind)]
    kind: CertificateKind,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

fn is_ocr_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "txt" | "json")
}

fn process_file(path: PathBuf, kind: CertificateKind, extractor: &CertificateExtractor) -> FileResult {
    let start = Instant::now();
    let outcome = read_input(&path).map(|input| extractor.extract(kind, &input));
    let processing_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(result) => FileResult {
            path,
            result: Some(result),
            error: None,
            processing_time_ms,
        },
        Err(e) => FileResult {
            path,
            result: None,
            error: Some(format!("{:#}", e)),
            processing_time_ms,
        },
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_ocr_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(CertificateExtractor::from_config(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let extractor = Arc::clone(&extractor);
        let kind = args.kind;
        tasks.spawn_blocking(move || {
            let _permit = permit;
            process_file(path, kind, &extractor)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let file = joined?;
        pb.inc(1);

        if let Some(message) = &file.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", file.path.display(), message);
            } else {
                error!("Failed to process {}: {}", file.path.display(), message);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", file.path.display(), message);
            }
        }
        results.push(file);
    }
    pb.finish_with_message("Complete");

    // Completion order is arbitrary
    results.sort_by(|a, b| a.path.cmp(&b.path));

    if let Some(output_dir) = &args.output_dir {
        for file in &results {
            let Some(result) = &file.result else {
                continue;
            };
            let path = output_path(output_dir, &file.path, args.format.extension());
            let content = format_result(result, args.format, config.output.pretty_json, config.output.show_missing)?;
            fs::write(&path, content)?;
            debug!("Wrote output to {}", path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let empty = results
        .iter()
        .filter(|r| r.result.as_ref().is_some_and(|res| res.certificate.is_empty()))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} with nothing readable, {} failed",
        style(results.len() - failed.len() - empty).green(),
        style(empty).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file in &failed {
            println!(
                "  - {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "kind",
        "strategy",
        "full_name",
        "personal_id",
        "competency_codes",
        "missing_fields",
        "processing_time_ms",
        "error",
    ])?;

    for file in results {
        let filename = file.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time = file.processing_time_ms.to_string();

        match &file.result {
            Some(result) => {
                let cert = &result.certificate;
                wtr.write_record([
                    filename,
                    "success",
                    cert.kind.as_str(),
                    result.strategy.as_str(),
                    cert.full_name.as_deref().unwrap_or(""),
                    cert.personal_id.as_deref().unwrap_or(""),
                    &cert.competency_codes.join(";"),
                    &cert.missing_fields().join(";"),
                    &time,
                    "",
                ])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    &time,
                    file.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
