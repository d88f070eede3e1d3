//! Batch command - extract expenses from many files concurrently.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use kharcha_core::{ExpenseParser, ExpenseRecord};

use super::parse::{format_record, OutputFormat};
use super::{content_hash, decode_text, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Treat every input as a bank SMS
    #[arg(long)]
    sms: bool,

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

/// Outcome for one input file.
struct FileResult {
    path: PathBuf,
    record: Option<ExpenseRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One row of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'a str,
    id: &'a str,
    amount: String,
    merchant: &'a str,
    category: &'a str,
    date: String,
    source: &'a str,
    confidence: String,
    needs_review: bool,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let review_threshold = config.extraction.review_threshold;
    let parser = Arc::new(ExpenseParser::new(config));

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

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

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut work = Vec::with_capacity(files.len());
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let loaded = match tokio::fs::read(&path).await {
            Ok(bytes) => decode_text(&path, &bytes).map(|text| (content_hash(&bytes), text)),
            Err(e) => Err(e.into()),
        };

        let (hash, text) = match loaded {
            Ok(loaded) => loaded,
            Err(e) if args.continue_on_error => {
                warn!("Failed to read {}: {}", path.display(), e);
                results.push(FileResult {
                    path,
                    record: None,
                    error: Some(e.to_string()),
                    processing_time_ms: 0,
                });
                pb.inc(1);
                continue;
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        };

        if !seen.insert(hash.clone()) {
            debug!("Skipping duplicate {}", path.display());
            duplicates.push(path);
            pb.inc(1);
            continue;
        }
        work.push((path, hash, text));
    }

    // At most `jobs` files are parsed at once.
    let jobs = args.jobs.max(1);
    let mut work = work.into_iter().peekable();

    while work.peek().is_some() {
        let handles: Vec<_> = work
            .by_ref()
            .take(jobs)
            .map(|(path, hash, text)| {
                tokio::task::spawn_blocking({
                    let parser = Arc::clone(&parser);
                    let sms = args.sms;
                    move || {
                        let file_start = Instant::now();
                        let expense = if sms {
                            parser.parse_sms_at(&text, Utc::now())
                        } else {
                            parser.parse_at(&text, Utc::now())
                        };
                        FileResult {
                            path,
                            record: expense.map(|e| ExpenseRecord::new(hash, e, review_threshold)),
                            error: None,
                            processing_time_ms: file_start.elapsed().as_millis() as u64,
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            let result = handle.await?;
            if result.record.is_none() {
                warn!("No expense found in {}", result.path.display());
            }
            results.push(result);
            pb.inc(1);
        }
    }

    pb.finish_with_message("Complete");
    results.sort_by(|a, b| a.path.cmp(&b.path));

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            let Some(record) = &result.record else {
                continue;
            };
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("expense");
            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
            fs::write(&output_path, format_record(record, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
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

    let found = results.iter().filter(|r| r.record.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let review = results
        .iter()
        .filter(|r| r.record.as_ref().is_some_and(|rec| rec.needs_review))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} expenses, {} need review, {} without expense, {} failed, {} duplicates skipped",
        style(found).green(),
        style(review).yellow(),
        style(results.len() - found - failed.len()).yellow(),
        style(failed.len()).red(),
        duplicates.len()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    for path in &duplicates {
        println!("  - duplicate: {}", path.display());
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let row = match &result.record {
            Some(record) => {
                let expense = &record.expense;
                SummaryRow {
                    filename,
                    status: "found",
                    id: &record.id,
                    amount: expense.amount().to_string(),
                    merchant: expense.merchant(),
                    category: expense.category().label(),
                    date: expense.date().to_rfc3339(),
                    source: expense.source(),
                    confidence: format!("{:.2}", expense.confidence()),
                    needs_review: record.needs_review,
                    processing_time_ms: result.processing_time_ms,
                    error: "",
                }
            }
            None => SummaryRow {
                filename,
                status: if result.error.is_some() { "error" } else { "not_found" },
                id: "",
                amount: String::new(),
                merchant: "",
                category: "",
                date: String::new(),
                source: "",
                confidence: String::new(),
                needs_review: false,
                processing_time_ms: result.processing_time_ms,
                error: result.error.as_deref().unwrap_or(""),
            },
        };
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}
