//! WASM bindings for kharcha.
//!
//! The OCR engine runs in the browser; these bindings take its text output (or a
//! pasted bank SMS) and return expense records as plain JS objects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use kharcha_core::{
    classify, normalize, Category, ExpenseParser, ExpenseRecord, KharchaConfig, ParsedExpense,
};

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Current time from the JS clock.
fn js_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Serialize to a plain JS object (maps become objects, not `Map`s).
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn expense_to_js(expense: Option<ParsedExpense>) -> Result<JsValue, JsValue> {
    match expense {
        Some(expense) => to_js(&expense),
        None => Ok(JsValue::NULL),
    }
}

/// Extract an expense from OCR text with the default configuration.
///
/// Returns `null` when no expense is found.
#[wasm_bindgen]
pub fn parse_expense(text: &str) -> Result<JsValue, JsValue> {
    let parser = ExpenseParser::default();
    expense_to_js(parser.parse_at(text, js_now()))
}

/// Extract an expense from a pasted bank SMS.
#[wasm_bindgen]
pub fn parse_bank_sms(text: &str) -> Result<JsValue, JsValue> {
    let parser = ExpenseParser::default();
    expense_to_js(parser.parse_sms_at(text, js_now()))
}

/// Normalize OCR text without repairing amounts.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    normalize(text)
}

/// Classify OCR text, returning one of `upi_receipt`, `food_delivery`,
/// `quick_commerce` or `unknown`.
#[wasm_bindgen]
pub fn classify_text(text: &str) -> Result<JsValue, JsValue> {
    let parser = ExpenseParser::default();
    to_js(&classify(&parser.preprocess(text)))
}

/// Category labels, in display order.
#[wasm_bindgen]
pub fn categories() -> js_sys::Array {
    Category::ALL
        .iter()
        .map(|c| JsValue::from_str(c.label()))
        .collect()
}

/// Configured expense scanner for repeated use from JS.
#[wasm_bindgen]
pub struct ExpenseScanner {
    parser: ExpenseParser,
}

#[wasm_bindgen]
impl ExpenseScanner {
    /// Create a scanner from an optional JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ExpenseScanner, JsValue> {
        let config = match config_json {
            Some(json) => {
                let config: KharchaConfig = serde_json::from_str(&json)
                    .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
                config
                    .validate()
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                config
            }
            None => KharchaConfig::default(),
        };

        Ok(Self {
            parser: ExpenseParser::new(config),
        })
    }

    /// Confidence below which records are flagged for review.
    #[wasm_bindgen(getter, js_name = reviewThreshold)]
    pub fn review_threshold(&self) -> f32 {
        self.parser.config().extraction.review_threshold
    }

    /// Scan OCR text. `content_hash` identifies the screenshot the text came from.
    pub fn scan(&self, text: &str, content_hash: &str) -> Result<JsValue, JsValue> {
        let expense = self.parser.parse_at(text, js_now());
        self.record_to_js(content_hash, expense)
    }

    /// Scan a pasted bank SMS.
    #[wasm_bindgen(js_name = scanSms)]
    pub fn scan_sms(&self, text: &str, content_hash: &str) -> Result<JsValue, JsValue> {
        let expense = self.parser.parse_sms_at(text, js_now());
        self.record_to_js(content_hash, expense)
    }

    /// Scan OCR text and return the full parse report.
    pub fn explain(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.report(text, js_now()))
    }

    fn record_to_js(
        &self,
        content_hash: &str,
        expense: Option<ParsedExpense>,
    ) -> Result<JsValue, JsValue> {
        match expense {
            Some(expense) => to_js(&ExpenseRecord::new(
                content_hash,
                expense,
                self.review_threshold(),
            )),
            None => Ok(JsValue::NULL),
        }
    }
}

impl Default for ExpenseScanner {
    fn default() -> Self {
        Self {
            parser: ExpenseParser::default(),
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const SWIGGY: &str = "Paid ₹664.70\nSwiggy\nBill Total ₹664.70\nDelivered\n";

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_parse_expense() {
        let value = parse_expense(SWIGGY).unwrap();
        let expense: ParsedExpense = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(expense.amount().to_string(), "664.70");
        assert_eq!(expense.source(), "Swiggy");
    }

    #[wasm_bindgen_test]
    fn test_parse_expense_returns_null() {
        assert!(parse_expense("hi").unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_parse_bank_sms() {
        let value = parse_bank_sms(
            "INR 2664.00 spent using ICICI Bank Card XX9006 on 11-Jan-26 on AMAZON PAY",
        )
        .unwrap();
        let expense: ParsedExpense = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(expense.merchant(), "Amazon");
    }

    #[wasm_bindgen_test]
    fn test_categories() {
        assert_eq!(categories().length(), 9);
    }

    #[wasm_bindgen_test]
    fn test_scanner_rejects_invalid_config() {
        let json = r#"{"extraction": {"review_threshold": 3.0}}"#;
        assert!(ExpenseScanner::new(Some(json.to_string())).is_err());
    }

    #[wasm_bindgen_test]
    fn test_scanner_record() {
        let scanner = ExpenseScanner::default();
        let value = scanner.scan(SWIGGY, "abc123").unwrap();
        let record: ExpenseRecord = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(record.id, "abc123");
        assert!(!record.needs_review);
    }
}
