//! Bank transaction SMS.
//!
//! SMS text is clean machine output, so it skips OCR repair entirely: the pipeline only
//! collapses whitespace and lowercases it. Three banks get a dedicated layout; every
//! other sender goes through the generic date and merchant patterns.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use super::rules::amounts::parse_amount;
use super::rules::dates::parse_sms_date;
use super::rules::keywords::{canonical_merchant, categorize, detect_bank, SMS_CATEGORY_RULES};
use super::rules::text::title_case;
use super::{ExpenseExtractor, ReceiptText};
use crate::models::{ExtractionConfig, ParsedExpense, UNKNOWN_MERCHANT};

lazy_static! {
    static ref AMOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?:\b(?:inr|rs\.?)|₹)\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"\b(?:txn|transaction)\s*(?:of\s*)?(?:inr|rs\.?|₹)\s*([\d,]+(?:\.\d+)?)").unwrap(),
    ];

    static ref ICICI_DATE: Regex =
        Regex::new(r"\bon\s+(\d{1,2}[-/][a-z]{3}[-/]\d{2,4})").unwrap();
    static ref ICICI_MERCHANT: Regex = Regex::new(
        r"\bon\s+\d{1,2}[-/][a-z]{3}[-/]\d{2,4}\s+on\s+([^.]+?)\.?\s*(?:avl|available|$)"
    ).unwrap();

    static ref FEDERAL_DATE: Regex =
        Regex::new(r"\bon\s+(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})").unwrap();
    static ref FEDERAL_MERCHANT: Regex =
        Regex::new(r"\bat\s+(.+?)\s+on\s+\d{1,2}[-/]").unwrap();

    static ref HDFC_DATE: Regex =
        Regex::new(r"\bon\s+(\d{1,2}[-/]\d{1,2}(?:[-/]\d{2,4})?)").unwrap();
    static ref HDFC_MERCHANT: Regex =
        Regex::new(r"\bat\s+(.+?)\s+(?:by|on\s+\d|not)\b").unwrap();

    static ref GENERIC_DATES: Vec<Regex> = vec![
        Regex::new(r"\bon\s+(\d{1,2}[-/][a-z]{3}[-/]\d{2,4})").unwrap(),
        Regex::new(r"\bon\s+(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})").unwrap(),
        Regex::new(r"\bdated?\s+(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})").unwrap(),
        Regex::new(r"\b(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})\b").unwrap(),
    ];

    static ref GENERIC_MERCHANTS: Vec<Regex> = vec![
        Regex::new(
            r"\b(?:at|to|on)\s+([a-z][a-z0-9\s@._-]+?)(?:\s+on\s+\d|\.|\s+avl|\s+available|\s+not|\s+by|\s+info)"
        ).unwrap(),
        Regex::new(r"\b(?:at|to)\s+([a-z][a-z0-9\s@._-]{2,30})").unwrap(),
    ];

    static ref LONG_DIGITS: Regex = Regex::new(r"\d{8,}").unwrap();
    static ref UPI_HANDLE: Regex = Regex::new(r"@[a-z]+\b").unwrap();
    static ref LEADING_PREPOSITION: Regex = Regex::new(r"^(?:at|on|to)\s+").unwrap();
}

const DEFAULT_SOURCE: &str = "Bank SMS";

/// Bank with a dedicated SMS layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BankLayout {
    /// `INR X spent using ICICI Bank Card XX1234 on 11-Jan-26 on MERCHANT. Avl Limit ...`
    Icici,
    /// `INR X spent on your credit card ending with 1234 at MERCHANT on 13-01-2026`
    Federal,
    /// `Txn Rs.X On HDFC Bank Card 1234 At MERCHANT by UPI ... On 07-09`
    Hdfc,
}

impl BankLayout {
    fn detect(text: &str) -> Option<Self> {
        if text.contains("icici") {
            Some(Self::Icici)
        } else if text.contains("federal bank") {
            Some(Self::Federal)
        } else if text.contains("hdfc") {
            Some(Self::Hdfc)
        } else {
            None
        }
    }

    fn bank(self) -> &'static str {
        match self {
            Self::Icici => "ICICI Bank",
            Self::Federal => "Federal Bank",
            Self::Hdfc => "HDFC Bank",
        }
    }

    fn date_pattern(self) -> &'static Regex {
        match self {
            Self::Icici => &ICICI_DATE,
            Self::Federal => &FEDERAL_DATE,
            Self::Hdfc => &HDFC_DATE,
        }
    }

    fn merchant_pattern(self) -> &'static Regex {
        match self {
            Self::Icici => &ICICI_MERCHANT,
            Self::Federal => &FEDERAL_MERCHANT,
            Self::Hdfc => &HDFC_MERCHANT,
        }
    }
}

fn first_capture<'t>(patterns: &[&Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|p| p.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

/// Normalize a raw merchant capture into a display name.
pub fn clean_merchant(raw: &str) -> String {
    let cleaned = LONG_DIGITS.replace_all(raw, "");
    let cleaned = UPI_HANDLE.replace_all(&cleaned, "");
    let cleaned = LEADING_PREPOSITION.replace(cleaned.trim(), "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return UNKNOWN_MERCHANT.to_string();
    }

    canonical_merchant(&collapsed.to_lowercase())
        .map(str::to_string)
        .unwrap_or_else(|| title_case(&collapsed))
}

/// Bank transaction SMS extractor.
pub struct BankSmsExtractor {
    max_amount: Decimal,
}

impl BankSmsExtractor {
    pub fn new(extraction: &ExtractionConfig) -> Self {
        Self {
            max_amount: extraction.sms_max_amount,
        }
    }

    /// First transaction amount below the balance ceiling.
    fn amount(&self, text: &str) -> Option<Decimal> {
        AMOUNT_PATTERNS.iter().find_map(|pattern| {
            let value = parse_amount(pattern.captures(text)?.get(1)?.as_str())?;
            (value > Decimal::ZERO && value < self.max_amount).then_some(value)
        })
    }
}

impl Default for BankSmsExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl ExpenseExtractor for BankSmsExtractor {
    fn name(&self) -> &'static str {
        "bank_sms"
    }

    fn extract(&self, input: &ReceiptText<'_>) -> Option<ParsedExpense> {
        let text = input.text;
        let amount = self.amount(text)?;
        let layout = BankLayout::detect(text);
        debug!("SMS layout: {:?}", layout);

        let generic_dates: Vec<&Regex> = GENERIC_DATES.iter().collect();
        let generic_merchants: Vec<&Regex> = GENERIC_MERCHANTS.iter().collect();

        let date_fragment = layout
            .and_then(|l| first_capture(&[l.date_pattern()], text))
            .or_else(|| first_capture(&generic_dates, text));
        let date = date_fragment
            .and_then(|fragment| parse_sms_date(fragment, input.now))
            .unwrap_or(input.now);

        let merchant_raw = layout
            .and_then(|l| first_capture(&[l.merchant_pattern()], text))
            .or_else(|| {
                debug!("No layout merchant, trying generic patterns");
                first_capture(&generic_merchants, text)
            });
        let merchant = merchant_raw
            .map(clean_merchant)
            .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string());

        let source = layout
            .map(BankLayout::bank)
            .or_else(|| detect_bank(text))
            .unwrap_or(DEFAULT_SOURCE);
        let category = categorize(SMS_CATEGORY_RULES, &merchant.to_lowercase(), "");

        debug!(
            "SMS result: amount={}, merchant={}, bank={}, category={}",
            amount, merchant, source, category
        );

        ParsedExpense::new(amount, merchant, category, date, source, 0.85, text)
            .inspect_err(|e| debug!("Rejected SMS record: {}", e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn extract(sms: &str) -> Option<ParsedExpense> {
        let text = sms.to_lowercase();
        BankSmsExtractor::default().extract(&ReceiptText::new(&text, now()))
    }

    #[test]
    fn test_icici_card_spend() {
        let expense = extract(
            "INR 2664.00 spent using ICICI Bank Card XX9006 on 11-Jan-26 on AMAZON PAY",
        )
        .unwrap();

        assert_eq!(expense.amount(), Decimal::from_str("2664.00").unwrap());
        assert_eq!(expense.source(), "ICICI Bank");
        assert_eq!(expense.merchant(), "Amazon");
        assert_eq!(expense.category(), Category::Shopping);
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap());
        assert!((expense.confidence() - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_icici_with_available_limit() {
        let expense = extract(
            "INR 450.00 spent using ICICI Bank Card XX9006 on 03-Feb-26 on SWIGGY. Avl Limit: INR 1,20,000.00",
        )
        .unwrap();

        assert_eq!(expense.merchant(), "Swiggy");
        assert_eq!(expense.category(), Category::FoodAndDining);
    }

    #[test]
    fn test_federal_bank() {
        let expense = extract(
            "INR 1,299.00 spent on your Federal Bank credit card ending with 4321 at BOOKMYSHOW on 13-01-2026",
        )
        .unwrap();

        assert_eq!(expense.amount(), Decimal::from_str("1299.00").unwrap());
        assert_eq!(expense.merchant(), "Bookmyshow");
        assert_eq!(expense.category(), Category::Entertainment);
        assert_eq!(expense.source(), "Federal Bank");
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 13, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_hdfc_day_month_uses_reference_year() {
        let expense = extract("Txn Rs.350 On HDFC Bank Card 1234 At ZEPTO by UPI 98765432101 On 07-09").unwrap();

        assert_eq!(expense.amount(), Decimal::from(350));
        assert_eq!(expense.merchant(), "Zepto");
        assert_eq!(expense.category(), Category::Groceries);
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 9, 7, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_generic_merchant_fills_missing_layout_merchant() {
        let expense = extract("Rs 120 debited from HDFC Bank a/c to rahul kumar@okaxis. Info: UPI").unwrap();

        assert_eq!(expense.source(), "HDFC Bank");
        assert_eq!(expense.merchant(), "Rahul Kumar");
        assert_eq!(expense.date(), now());
    }

    #[test]
    fn test_generic_bank() {
        let expense = extract("Your SBI a/c debited by Rs.560.50 dated 02/01/26 at APOLLO PHARMACY. Avl bal Rs 12,000").unwrap();

        assert_eq!(expense.amount(), Decimal::from_str("560.50").unwrap());
        assert_eq!(expense.source(), "SBI");
        assert_eq!(expense.merchant(), "Apollo Pharmacy");
        assert_eq!(expense.category(), Category::Health);
        assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_balance_sized_amount_rejected() {
        assert!(extract("Avl bal INR 25,00,000.00 as of today").is_none());
        assert!(extract("Your OTP is 482913").is_none());
    }

    #[test]
    fn test_clean_merchant() {
        assert_eq!(clean_merchant("to  paytm 123456789012"), "Paytm");
        assert_eq!(clean_merchant("local kirana@ybl"), "Local Kirana");
        assert_eq!(clean_merchant("12345678"), UNKNOWN_MERCHANT);
    }
}
