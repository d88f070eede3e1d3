//! UPI payment receipts (Google Pay, PhonePe, Paytm, BHIM).

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use super::cascade::{select_amount, CascadeOptions};
use super::rules::amounts::AmountOptions;
use super::rules::dates::parse_date;
use super::rules::keywords::{categorize, detect_payment_app, UPI_CATEGORY_RULES};
use super::rules::patterns::UPI_LABEL_AMOUNT;
use super::rules::text::title_case;
use super::{ExpenseExtractor, ReceiptText};
use crate::models::{ExtractionConfig, ParsedExpense, RepairConfig, UNKNOWN_MERCHANT};

lazy_static! {
    // The name ends at a trailing "on"/"via"/"at" phrase, a number or punctuation.
    static ref TO_NAME: Regex = Regex::new(
        r"\bto[:\s]+([a-z0-9.&_-]+(?: +[a-z0-9.&_-]+)*?)(?: +(?:on|via|at)\b| +\d| *$|[^a-z0-9 .&_-])"
    ).unwrap();

    static ref PAID_TO_NAME: Regex = Regex::new(r"paid\s+to +([a-z][a-z .&]{2,30})").unwrap();

    static ref HEADER_CHROME: Regex =
        Regex::new(r"completed|paid|repeat|transaction|upi|google|payment|phonepe|paytm|bhim|gpay").unwrap();

    static ref CURRENCY_MARK: Regex = Regex::new(r"₹|\brs\.?").unwrap();

    static ref DAY_MONTH: Regex =
        Regex::new(r"\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)").unwrap();

    static ref BUSINESS_NAME: Regex = Regex::new(r"^[a-z][a-z\s.&]{2,30}$").unwrap();
}

const LABELS: &[&str] = &["total amount", "amount paid", "paid", "amount"];

const NOISE: &[&str] = &[
    "cashback",
    "plan price",
    "fee for",
    "inclusive",
    "transaction id",
    "utr",
    "ref no",
];

const REJECTED_STATES: &[&str] = &["failed", "pending", "declined"];
const COMPLETED_STATES: &[&str] = &["completed", "successful"];

/// UPI receipt extractor.
pub struct UpiExtractor {
    cascade: CascadeOptions,
}

impl UpiExtractor {
    pub fn new(repair: &RepairConfig, extraction: &ExtractionConfig) -> Self {
        Self {
            cascade: CascadeOptions {
                labels: LABELS,
                label_amount: &UPI_LABEL_AMOUNT,
                noise: NOISE,
                fallback: extraction.upi_fallback,
                year_exclusion: extraction.year_exclusion,
                amounts: AmountOptions::from_repair(repair)
                    .with_fix_misread(extraction.fix_misread_currency),
            },
        }
    }

    fn merchant(&self, input: &ReceiptText<'_>) -> Option<String> {
        for line in &input.lines {
            let Some(m) = TO_NAME.captures(line).and_then(|caps| caps.get(1)) else {
                continue;
            };
            let name = m.as_str().trim();
            let email_like = name.contains('@') || line[m.end()..].starts_with('@');
            if !email_like && !name.chars().all(|c| c.is_ascii_digit()) && name.len() > 2 {
                debug!("Merchant from 'to' line: {}", name);
                return Some(title_case(name));
            }
        }

        for line in input.lines.iter().take(10) {
            if HEADER_CHROME.is_match(line) || CURRENCY_MARK.is_match(line) || DAY_MONTH.is_match(line) {
                continue;
            }
            if BUSINESS_NAME.is_match(line) {
                debug!("Merchant from header: {}", line);
                return Some(title_case(line));
            }
        }

        let name = PAID_TO_NAME.captures(input.text)?;
        debug!("Merchant from 'paid to': {}", &name[1]);
        Some(title_case(name[1].trim()))
    }
}

impl Default for UpiExtractor {
    fn default() -> Self {
        Self::new(&RepairConfig::default(), &ExtractionConfig::default())
    }
}

fn is_rejected(text: &str) -> bool {
    REJECTED_STATES.iter().any(|s| text.contains(s))
        && !COMPLETED_STATES.iter().any(|s| text.contains(s))
}

/// Rule-based confidence: a base score plus credit for each resolved field.
fn confidence(merchant_found: bool, date_found: bool) -> f32 {
    let mut score = 0.4 + 0.2;
    if merchant_found {
        score += 0.25;
    }
    if date_found {
        score += 0.15;
    }
    f32::min(score, 1.0)
}

impl ExpenseExtractor for UpiExtractor {
    fn name(&self) -> &'static str {
        "upi"
    }

    fn extract(&self, input: &ReceiptText<'_>) -> Option<ParsedExpense> {
        if is_rejected(input.text) {
            info!("Transaction failed or pending, skipping");
            return None;
        }

        let (amount, strategy) = select_amount(input, &self.cascade)?;

        let merchant = self.merchant(input);
        let date = parse_date(input.text);
        let merchant_name = merchant.clone().unwrap_or_else(|| UNKNOWN_MERCHANT.to_string());
        let category = categorize(UPI_CATEGORY_RULES, &merchant_name.to_lowercase(), input.text);

        debug!(
            "UPI result: amount={} via {}, merchant={}, category={}",
            amount, strategy, merchant_name, category
        );

        ParsedExpense::new(
            amount,
            merchant_name,
            category,
            date.unwrap_or(input.now),
            detect_payment_app(input.text),
            confidence(merchant.is_some(), date.is_some()),
            input.text,
        )
        .inspect_err(|e| debug!("Rejected UPI record: {}", e))
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn extract(text: &str) -> Option<ParsedExpense> {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap();
        UpiExtractor::default().extract(&ReceiptText::new(text, now))
    }

    #[test]
    fn test_google_pay_receipt() {
        let expense = extract("google pay\npaid to vi prepaid\n₹299\ncompleted\n11 jan 2026").unwrap();

        assert_eq!(expense.amount(), Decimal::from(299));
        assert_eq!(expense.merchant(), "Vi Prepaid");
        assert_eq!(expense.category(), Category::Utilities);
        assert_eq!(expense.source(), "GPay");
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap());
        assert!((expense.confidence() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_failed_and_pending() {
        assert!(extract("failed ₹500").is_none());
        assert!(extract("phonepe\npayment pending\n₹120").is_none());
        assert!(extract("payment declined ₹90").is_none());
    }

    #[test]
    fn test_failed_retry_then_completed() {
        let expense = extract("first attempt failed\npaid ₹450\ncompleted").unwrap();
        assert_eq!(expense.amount(), Decimal::from(450));
    }

    #[test]
    fn test_header_merchant_and_app() {
        let expense = extract("sharma stores\nphonepe\n₹1,250\nsuccessful").unwrap();

        assert_eq!(expense.merchant(), "Sharma Stores");
        assert_eq!(expense.source(), "PhonePe");
        assert_eq!(expense.category(), Category::Shopping);
    }

    #[test]
    fn test_unknown_merchant_lowers_confidence() {
        let expense = extract("upi\n₹80\ncompleted").unwrap();

        assert_eq!(expense.merchant(), UNKNOWN_MERCHANT);
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap());
        assert!((expense.confidence() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_email_like_to_is_ignored() {
        let expense = extract("to: ravi@okaxis\npaid to ravi kumar\n₹200\ncompleted").unwrap();
        assert_eq!(expense.merchant(), "Ravi Kumar");
    }

    #[test]
    fn test_to_name_stops_at_trailing_context() {
        let expense = extract("google pay\npaid to vi prepaid on 11 jan 2026\n₹299").unwrap();
        assert_eq!(expense.merchant(), "Vi Prepaid");
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap());

        let expense = extract("sent to sharma stores via upi\n₹450\ncompleted").unwrap();
        assert_eq!(expense.merchant(), "Sharma Stores");

        let expense = extract("to ravi kumar 9876543210\n₹120\ncompleted").unwrap();
        assert_eq!(expense.merchant(), "Ravi Kumar");
    }

    #[test]
    fn test_no_amount() {
        assert!(extract("google pay\ncompleted").is_none());
    }
}
