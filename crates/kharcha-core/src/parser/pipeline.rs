//! End-to-end expense parsing: preprocessing, classification, extraction and fallback.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::bank_sms::BankSmsExtractor;
use super::classifier::{classify, DocumentType};
use super::food::FoodDeliveryExtractor;
use super::quick_commerce::QuickCommerceExtractor;
use super::upi::UpiExtractor;
use super::{ExpenseExtractor, ReceiptText};
use crate::models::{KharchaConfig, ParsedExpense};
use crate::ocr::{preprocess, AmountRepairer};

/// Outcome of a single parse, with the decisions that led to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    /// Screenshot type, `None` for bank SMS.
    pub document_type: Option<DocumentType>,
    /// Extractor that produced the expense.
    pub extractor: Option<&'static str>,
    /// The classified extractor came up empty and the fallback chain ran.
    pub used_fallback: bool,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
    pub expense: Option<ParsedExpense>,
}

impl ParseReport {
    fn empty(document_type: Option<DocumentType>) -> Self {
        Self {
            document_type,
            extractor: None,
            used_fallback: false,
            processing_time_ms: 0,
            expense: None,
        }
    }
}

/// Milliseconds since the timer was started.
#[cfg(not(target_arch = "wasm32"))]
fn start_timer() -> impl Fn() -> u64 {
    let start = Instant::now();
    move || start.elapsed().as_millis() as u64
}

// std::time::Instant panics on wasm32-unknown-unknown.
#[cfg(target_arch = "wasm32")]
fn start_timer() -> impl Fn() -> u64 {
    || 0
}

/// Expense parser for OCR text and bank SMS.
///
/// Holds only immutable configuration and extractors, so one instance can be shared
/// across threads.
pub struct ExpenseParser {
    config: KharchaConfig,
    repairer: AmountRepairer,
    upi: UpiExtractor,
    food: FoodDeliveryExtractor,
    quick_commerce: QuickCommerceExtractor,
    bank_sms: BankSmsExtractor,
}

impl ExpenseParser {
    pub fn new(config: KharchaConfig) -> Self {
        let repair = &config.repair;
        let extraction = &config.extraction;
        Self {
            repairer: AmountRepairer::new(repair.clone()),
            upi: UpiExtractor::new(repair, extraction),
            food: FoodDeliveryExtractor::new(repair, extraction),
            quick_commerce: QuickCommerceExtractor::new(repair, extraction),
            bank_sms: BankSmsExtractor::new(extraction),
            config,
        }
    }

    pub fn config(&self) -> &KharchaConfig {
        &self.config
    }

    /// Normalized, repaired and lowercased text, as seen by the extractors.
    pub fn preprocess(&self, raw: &str) -> String {
        preprocess(raw, &self.repairer).to_lowercase()
    }

    /// Parse OCR text, using the current time when no date is found.
    pub fn parse(&self, raw: &str) -> Option<ParsedExpense> {
        self.parse_at(raw, Utc::now())
    }

    /// Parse OCR text with an explicit reference instant.
    pub fn parse_at(&self, raw: &str, now: DateTime<Utc>) -> Option<ParsedExpense> {
        self.report(raw, now).expense
    }

    /// Parse a pasted bank SMS.
    pub fn parse_sms(&self, raw: &str) -> Option<ParsedExpense> {
        self.parse_sms_at(raw, Utc::now())
    }

    pub fn parse_sms_at(&self, raw: &str, now: DateTime<Utc>) -> Option<ParsedExpense> {
        self.report_sms(raw, now).expense
    }

    fn too_short(&self, raw: &str) -> bool {
        let short = raw.trim().chars().count() < self.config.extraction.min_text_length;
        if short {
            debug!("Input too short ({} chars), skipping", raw.trim().chars().count());
        }
        short
    }

    fn extractor_for(&self, document_type: DocumentType) -> Option<&dyn ExpenseExtractor> {
        match document_type {
            DocumentType::UpiReceipt => Some(&self.upi),
            DocumentType::FoodDelivery => Some(&self.food),
            DocumentType::QuickCommerce => Some(&self.quick_commerce),
            DocumentType::Unknown => None,
        }
    }

    fn fallback_chain(&self) -> [&dyn ExpenseExtractor; 3] {
        [&self.upi, &self.food, &self.quick_commerce]
    }

    /// Parse OCR text and report how the result was reached.
    pub fn report(&self, raw: &str, now: DateTime<Utc>) -> ParseReport {
        let elapsed_ms = start_timer();
        if self.too_short(raw) {
            return ParseReport::empty(None);
        }

        let text = self.preprocess(raw);
        let input = ReceiptText::new(&text, now);
        let document_type = classify(&text);
        info!("Parsing {} lines of OCR text as {}", input.lines.len(), document_type);

        let primary = self.extractor_for(document_type);
        let run = |extractor: &dyn ExpenseExtractor| {
            extractor
                .extract(&input)
                .map(|expense| (extractor.name(), expense))
        };

        let mut outcome = primary.and_then(run);
        let used_fallback = outcome.is_none();
        if used_fallback {
            let failed = primary.map(|e| e.name());
            outcome = self
                .fallback_chain()
                .into_iter()
                .filter(|e| Some(e.name()) != failed)
                .find_map(|e| {
                    debug!("Trying fallback extractor {}", e.name());
                    run(e)
                });
        }

        let (extractor, expense) = outcome.unzip();
        match &expense {
            Some(e) => info!(
                "Extracted ₹{} at {} via {} (confidence {:.2})",
                e.amount(),
                e.merchant(),
                extractor.unwrap_or_default(),
                e.confidence()
            ),
            None => info!("No expense found"),
        }

        ParseReport {
            document_type: Some(document_type),
            extractor,
            used_fallback,
            processing_time_ms: elapsed_ms(),
            expense,
        }
    }

    /// Parse a bank SMS and report how the result was reached.
    pub fn report_sms(&self, raw: &str, now: DateTime<Utc>) -> ParseReport {
        let elapsed_ms = start_timer();
        if self.too_short(raw) {
            return ParseReport::empty(None);
        }

        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let input = ReceiptText::new(&text, now);
        info!("Parsing bank SMS ({} chars)", text.len());

        let expense = self.bank_sms.extract(&input);
        match &expense {
            Some(e) => info!("Extracted ₹{} at {} from {}", e.amount(), e.merchant(), e.source()),
            None => info!("No transaction found in SMS"),
        }

        ParseReport {
            extractor: expense.as_ref().map(|_| self.bank_sms.name()),
            processing_time_ms: elapsed_ms(),
            expense,
            ..ParseReport::empty(None)
        }
    }
}

impl Default for ExpenseParser {
    fn default() -> Self {
        Self::new(KharchaConfig::default())
    }
}
