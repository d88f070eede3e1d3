//! Data models: the expense record and pipeline configuration.

pub mod config;
pub mod expense;

pub use config::{AmountRange, ExtractionConfig, KharchaConfig, RepairConfig};
pub use expense::{Category, Currency, ExpenseRecord, ParsedExpense, UNKNOWN_MERCHANT};
