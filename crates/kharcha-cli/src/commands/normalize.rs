//! Normalize command - print the intermediate text of the preprocessing passes.

use std::path::PathBuf;

use clap::Args;

use kharcha_core::ocr::normalize;
use kharcha_core::parser::classify;
use kharcha_core::{AmountRepairer, ExpenseParser};

use super::{decode_text, load_config, read_input};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Input file, `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Last pass to run
    #[arg(short, long, value_enum, default_value = "full")]
    stage: Stage,

    /// Also print the screenshot classification
    #[arg(long)]
    classify: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Stage {
    /// Whitespace, pipes, zero-like letters and currency markers only
    Normalize,
    /// Normalization plus amount repair, before masking
    Repair,
    /// Everything the extractors see: repaired, masked and lowercased
    Full,
}

pub async fn run(args: NormalizeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let bytes = read_input(&args.input)?;
    let raw = decode_text(&args.input, &bytes)?;

    let text = match args.stage {
        Stage::Normalize => normalize(&raw),
        Stage::Repair => AmountRepairer::new(config.repair).repair(&normalize(&raw)),
        Stage::Full => ExpenseParser::new(config).preprocess(&raw),
    };

    println!("{}", text);
    if args.classify {
        eprintln!("Document type: {}", classify(&text.to_lowercase()));
    }

    Ok(())
}
