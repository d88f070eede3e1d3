//! Layered amount selection shared by the receipt extractors.
//!
//! Strategies run in order and the first one that yields an amount wins:
//!
//! 1. [`label_search`]: an amount on the line carrying the highest-priority label.
//! 2. [`label_adjacency`]: a label directly followed by a number.
//! 3. [`filtered_maximum`]: the largest amount on lines that are not fees, taxes or
//!    line items.
//! 4. [`broad_fallback`]: the largest amount anywhere inside the fallback range.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use super::ReceiptText;
use super::rules::amounts::{extract_amounts, is_year_like, AmountOptions};
use super::rules::patterns::{DATE_SHAPED, QUANTITY_MARKER};
use super::rules::text::{has_any_word, word_starts};
use crate::models::AmountRange;

/// Parameters for one extractor's cascade.
#[derive(Debug, Clone)]
pub struct CascadeOptions {
    /// Labels in priority order.
    pub labels: &'static [&'static str],

    /// Label immediately followed by a number, with the number in group 1.
    pub label_amount: &'static Regex,

    /// Noise words for this receipt type, on top of [`SHARED_NOISE`].
    pub noise: &'static [&'static str],

    /// Accepted range for [`broad_fallback`].
    pub fallback: AmountRange,

    /// Whole numbers in this range are years, not amounts.
    pub year_exclusion: AmountRange,

    pub amounts: AmountOptions,
}

/// Fee, tax and adjustment words that mark a line as not carrying the total.
///
/// Matched as whole words or phrases, so "tip" does not hit "multiple".
pub const SHARED_NOISE: &[&str] = &[
    "delivery fee",
    "platform fee",
    "gst",
    "gstin",
    "tax",
    "taxes",
    "discount",
    "tip",
];

/// Words that turn a bare label into a line-item figure ("item total", "sub total").
const LABEL_QUALIFIERS: &[&str] = &["item", "sub"];

/// A single amount selection strategy.
pub type Strategy = fn(&ReceiptText<'_>, &CascadeOptions) -> Option<Decimal>;

/// Every strategy, in evaluation order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("label_search", label_search),
    ("label_adjacency", label_adjacency),
    ("filtered_maximum", filtered_maximum),
    ("broad_fallback", broad_fallback),
];

/// Run the cascade, returning the chosen amount and the strategy that found it.
pub fn select_amount(
    input: &ReceiptText<'_>,
    options: &CascadeOptions,
) -> Option<(Decimal, &'static str)> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(input, options).filter(|amount| *amount > Decimal::ZERO);
        match found {
            Some(amount) => debug!("Strategy {}: found {}", name, amount),
            None => debug!("Strategy {}: nothing", name),
        }
        found.map(|amount| (amount, *name))
    })
}

fn line_has_label(line: &str, label: &str) -> bool {
    if label.contains(' ') {
        return line.contains(label);
    }

    word_starts(line, label).any(|start| {
        let preceding = line[..start]
            .split_whitespace()
            .next_back()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()));
        !preceding.is_some_and(|word| LABEL_QUALIFIERS.contains(&word))
    })
}

/// Amounts on a line, with date-shaped text removed first.
fn line_amounts(line: &str, options: &CascadeOptions) -> Vec<Decimal> {
    let without_dates = DATE_SHAPED.replace_all(line, " ");
    extract_amounts(&without_dates, &options.amounts)
}

fn is_noise_line(line: &str, options: &CascadeOptions) -> bool {
    has_any_word(line, SHARED_NOISE) || has_any_word(line, options.noise)
}

/// Last amount on the first line carrying a label, trying labels in priority order.
///
/// Single-word labels match on word boundaries, except after a qualifier, so
/// "item total" never answers for "total".
pub fn label_search(input: &ReceiptText<'_>, options: &CascadeOptions) -> Option<Decimal> {
    options.labels.iter().find_map(|label| {
        input
            .lines
            .iter()
            .filter(|line| line_has_label(line, label))
            .find_map(|line| line_amounts(line, options).last().copied())
    })
}

/// First line where a label is directly followed by a number.
pub fn label_adjacency(input: &ReceiptText<'_>, options: &CascadeOptions) -> Option<Decimal> {
    input.lines.iter().find_map(|line| {
        options
            .label_amount
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| options.amounts.resolve(m.as_str()))
    })
}

/// Largest amount outside fee, tax and line-item lines, ignoring dates and years.
pub fn filtered_maximum(input: &ReceiptText<'_>, options: &CascadeOptions) -> Option<Decimal> {
    input
        .lines
        .iter()
        .filter(|line| !is_noise_line(line, options))
        .filter(|line| !QUANTITY_MARKER.is_match(line))
        .flat_map(|line| line_amounts(line, options))
        .filter(|amount| !is_year_like(*amount, &options.year_exclusion))
        .max()
}

/// Largest amount anywhere in the text inside the fallback range.
pub fn broad_fallback(input: &ReceiptText<'_>, options: &CascadeOptions) -> Option<Decimal> {
    extract_amounts(input.text, &options.amounts)
        .into_iter()
        .filter(|amount| options.fallback.contains(*amount))
        .filter(|amount| !is_year_like(*amount, &options.year_exclusion))
        .max()
}
