//! Expense extraction: classification, per-type extractors and the pipeline.

pub mod bank_sms;
pub mod cascade;
pub mod classifier;
pub mod food;
pub mod pipeline;
pub mod quick_commerce;
pub mod rules;
pub mod upi;

pub use bank_sms::BankSmsExtractor;
pub use cascade::CascadeOptions;
pub use classifier::{classify, DocumentType};
pub use food::FoodDeliveryExtractor;
pub use pipeline::{ExpenseParser, ParseReport};
pub use quick_commerce::QuickCommerceExtractor;
pub use upi::UpiExtractor;

use chrono::{DateTime, Utc};

use crate::models::ParsedExpense;
use crate::ocr::split_lines;

/// Preprocessed receipt text handed to an extractor.
#[derive(Debug, Clone)]
pub struct ReceiptText<'a> {
    /// Normalized, repaired, lowercased text.
    pub text: &'a str,
    /// Non-empty trimmed lines of `text`.
    pub lines: Vec<&'a str>,
    /// Reference instant used when no date can be recovered.
    pub now: DateTime<Utc>,
}

impl<'a> ReceiptText<'a> {
    pub fn new(text: &'a str, now: DateTime<Utc>) -> Self {
        Self {
            text,
            lines: split_lines(text),
            now,
        }
    }
}

/// Trait for document-specific expense extractors.
pub trait ExpenseExtractor: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Extract an expense, or `None` when no plausible amount exists.
    fn extract(&self, input: &ReceiptText<'_>) -> Option<ParsedExpense>;
}
