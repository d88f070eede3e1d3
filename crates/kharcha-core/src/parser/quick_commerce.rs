//! Quick-commerce receipts (Swiggy Instamart).

use tracing::debug;

use super::cascade::{select_amount, CascadeOptions};
use super::rules::amounts::AmountOptions;
use super::rules::dates::parse_date;
use super::rules::patterns::QUICK_COMMERCE_LABEL_AMOUNT;
use super::{ExpenseExtractor, ReceiptText};
use crate::models::{Category, ExtractionConfig, ParsedExpense, RepairConfig};

const LABELS: &[&str] = &["grand total", "total", "amount paid", "paid"];

const NOISE: &[&str] = &["handling", "free", "item bill"];

const MERCHANT: &str = "Swiggy Instamart";
const SOURCE: &str = "Instamart";

pub struct QuickCommerceExtractor {
    cascade: CascadeOptions,
}

impl QuickCommerceExtractor {
    pub fn new(repair: &RepairConfig, extraction: &ExtractionConfig) -> Self {
        Self {
            cascade: CascadeOptions {
                labels: LABELS,
                label_amount: &QUICK_COMMERCE_LABEL_AMOUNT,
                noise: NOISE,
                fallback: extraction.quick_commerce_fallback,
                year_exclusion: extraction.year_exclusion,
                amounts: AmountOptions::from_repair(repair),
            },
        }
    }
}

impl Default for QuickCommerceExtractor {
    fn default() -> Self {
        Self::new(&RepairConfig::default(), &ExtractionConfig::default())
    }
}

impl ExpenseExtractor for QuickCommerceExtractor {
    fn name(&self) -> &'static str {
        "quick_commerce"
    }

    fn extract(&self, input: &ReceiptText<'_>) -> Option<ParsedExpense> {
        let (amount, strategy) = select_amount(input, &self.cascade)?;
        debug!("Quick commerce result: amount={} via {}", amount, strategy);

        ParsedExpense::new(
            amount,
            MERCHANT,
            Category::Groceries,
            parse_date(input.text).unwrap_or(input.now),
            SOURCE,
            0.9,
            input.text,
        )
        .inspect_err(|e| debug!("Rejected quick commerce record: {}", e))
        .ok()
    }
}
