//! Core library for expense extraction from payment screenshots and bank SMS.
//!
//! This crate provides:
//! - OCR text normalization and amount repair (misread rupee glyphs, lost decimals)
//! - Screenshot classification (UPI, food delivery, quick commerce)
//! - Rule-based extractors for amount, merchant, category, date and source
//! - A bank SMS parser with per-bank layouts
//!
//! The OCR engine itself is out of scope: callers hand over recognized text.

pub mod error;
pub mod models;
pub mod ocr;
pub mod parser;

pub use error::{ConfigError, ExtractionError, KharchaError, Result};
pub use models::{
    AmountRange, Category, Currency, ExpenseRecord, ExtractionConfig, KharchaConfig,
    ParsedExpense, RepairConfig, UNKNOWN_MERCHANT,
};
pub use ocr::{normalize, AmountRepairer, OcrOutput};
pub use parser::{classify, DocumentType, ExpenseExtractor, ExpenseParser, ParseReport, ReceiptText};
