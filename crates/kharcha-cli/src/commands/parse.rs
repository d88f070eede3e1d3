//! Parse command - extract an expense from a single input.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;
use tracing::{debug, info};

use kharcha_core::{ExpenseParser, ExpenseRecord, ParseReport};

use super::{content_hash, decode_text, load_config, read_input};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (OCR text, OCR JSON output, or SMS), `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as a bank SMS
    #[arg(long)]
    sms: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show how the result was reached
    #[arg(long)]
    explain: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let review_threshold = config.extraction.review_threshold;
    let parser = ExpenseParser::new(config);

    let bytes = read_input(&args.input)?;
    let text = decode_text(&args.input, &bytes)?;
    info!("Parsing {} ({} bytes)", args.input.display(), bytes.len());

    let report = if args.sms {
        parser.report_sms(&text, Utc::now())
    } else {
        parser.report(&text, Utc::now())
    };

    if args.explain {
        explain(&report);
    }

    let Some(expense) = report.expense else {
        eprintln!(
            "{} No expense found. Try a clearer screenshot or paste the full SMS.",
            style("!").yellow()
        );
        return Ok(());
    };

    let record = ExpenseRecord::new(content_hash(&bytes), expense, review_threshold);
    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if record.needs_review {
        eprintln!(
            "{} Low confidence ({:.0}%), please review before saving.",
            style("ℹ").blue(),
            record.expense.confidence() * 100.0
        );
    }

    debug!("Parse finished in {}ms", report.processing_time_ms);
    Ok(())
}

fn explain(report: &ParseReport) {
    let document_type = report
        .document_type
        .map(|t| t.to_string())
        .unwrap_or_else(|| "Bank SMS".to_string());

    eprintln!("{} Document type: {}", style("ℹ").blue(), document_type);
    eprintln!(
        "{} Extractor: {}{}",
        style("ℹ").blue(),
        report.extractor.unwrap_or("none"),
        if report.used_fallback { " (fallback)" } else { "" }
    );
    eprintln!("{} Processing time: {}ms", style("ℹ").blue(), report.processing_time_ms);
}

/// Render a record in the requested format.
pub fn format_record(record: &ExpenseRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_record_csv(record),
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

fn format_record_csv(record: &ExpenseRecord) -> anyhow::Result<String> {
    let expense = &record.expense;
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "amount",
        "currency",
        "merchant",
        "category",
        "date",
        "source",
        "confidence",
        "needs_review",
    ])?;

    wtr.write_record([
        record.id.as_str(),
        &expense.amount().to_string(),
        expense.currency().code(),
        expense.merchant(),
        expense.category().label(),
        &expense.date().to_rfc3339(),
        expense.source(),
        &format!("{:.2}", expense.confidence()),
        &record.needs_review.to_string(),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_record_text(record: &ExpenseRecord) -> String {
    let expense = &record.expense;
    let mut output = String::new();

    output.push_str(&format!(
        "{}{} at {}\n",
        expense.currency().symbol(),
        expense.amount(),
        expense.merchant()
    ));
    output.push_str(&format!("Category:   {}\n", expense.category()));
    output.push_str(&format!("Date:       {}\n", expense.date().format("%d %b %Y, %H:%M")));
    output.push_str(&format!("Source:     {}\n", expense.source()));
    output.push_str(&format!("Confidence: {:.0}%\n", expense.confidence() * 100.0));
    if record.needs_review {
        output.push_str("Needs review\n");
    }

    output
}
