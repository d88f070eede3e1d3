//! Expense record produced by the extraction pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Merchant sentinel used when no name could be recovered.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Indian rupee.
    #[default]
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
        }
    }

    /// Canonical glyph used in normalized text.
    pub fn symbol(&self) -> char {
        match self {
            Self::Inr => '₹',
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Subscriptions")]
    Subscriptions,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Health")]
    Health,
    /// Catch-all when no rule matches.
    #[default]
    #[serde(rename = "Miscellaneous")]
    Miscellaneous,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Self::FoodAndDining,
        Self::Groceries,
        Self::Utilities,
        Self::Subscriptions,
        Self::Shopping,
        Self::Transport,
        Self::Entertainment,
        Self::Health,
        Self::Miscellaneous,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Groceries => "Groceries",
            Self::Utilities => "Utilities",
            Self::Subscriptions => "Subscriptions",
            Self::Shopping => "Shopping",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Miscellaneous => "Miscellaneous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or(())
    }
}

/// A structured expense extracted from OCR or SMS text.
///
/// Construction goes through [`ParsedExpense::new`], which enforces the record
/// invariants; fields are read-only afterwards. Deserialization is checked the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ParsedExpenseData")]
pub struct ParsedExpense {
    amount: Decimal,
    currency: Currency,
    merchant: String,
    category: Category,
    date: DateTime<Utc>,
    source: String,
    confidence: f32,
    raw_text: String,
}

/// Unchecked wire form of [`ParsedExpense`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedExpenseData {
    amount: Decimal,
    merchant: String,
    category: Category,
    date: DateTime<Utc>,
    source: String,
    confidence: f32,
    #[serde(default)]
    raw_text: String,
}

impl TryFrom<ParsedExpenseData> for ParsedExpense {
    type Error = ExtractionError;

    fn try_from(data: ParsedExpenseData) -> Result<Self, Self::Error> {
        Self::new(
            data.amount,
            data.merchant,
            data.category,
            data.date,
            data.source,
            data.confidence,
            data.raw_text,
        )
    }
}

impl ParsedExpense {
    /// Build a validated record.
    ///
    /// The amount is rounded and rescaled to two decimal places.
    pub fn new(
        amount: Decimal,
        merchant: impl Into<String>,
        category: Category,
        date: DateTime<Utc>,
        source: impl Into<String>,
        confidence: f32,
        raw_text: impl Into<String>,
    ) -> Result<Self, ExtractionError> {
        let mut amount = amount.round_dp(2);
        amount.rescale(2);
        if amount <= Decimal::ZERO {
            return Err(ExtractionError::NonPositiveAmount(amount));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ExtractionError::ConfidenceOutOfRange(confidence));
        }

        let merchant = merchant.into();
        if merchant.trim().is_empty() {
            return Err(ExtractionError::MissingField("merchant"));
        }
        let source = source.into();
        if source.trim().is_empty() {
            return Err(ExtractionError::MissingField("source"));
        }

        Ok(Self {
            amount,
            currency: Currency::Inr,
            merchant,
            category,
            date,
            source,
            confidence,
            raw_text: raw_text.into(),
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn merchant(&self) -> &str {
        &self.merchant
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Normalized text the record was extracted from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Whether the record should be confirmed by the user before saving.
    pub fn needs_review(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }
}

/// An expense paired with a caller-supplied content hash.
///
/// The hash (of the screenshot bytes or SMS text) is the deduplication key; the core
/// never computes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Content hash used as the record id.
    pub id: String,
    /// The extracted expense.
    #[serde(flatten)]
    pub expense: ParsedExpense,
    /// Confidence fell below the review threshold.
    pub needs_review: bool,
}

impl ExpenseRecord {
    pub fn new(content_hash: impl Into<String>, expense: ParsedExpense, review_threshold: f32) -> Self {
        let needs_review = expense.needs_review(review_threshold);
        Self {
            id: content_hash.into(),
            expense,
            needs_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_amount_is_rescaled() {
        let expense = ParsedExpense::new(
            Decimal::from(299),
            "Vi Prepaid",
            Category::Utilities,
            date(),
            "GPay",
            1.0,
            "",
        )
        .unwrap();

        assert_eq!(expense.amount().to_string(), "299.00");
        assert_eq!(expense.currency(), Currency::Inr);
    }

    #[test]
    fn test_rejects_invalid_records() {
        assert_eq!(
            ParsedExpense::new(Decimal::ZERO, "X", Category::Health, date(), "Bank SMS", 0.5, ""),
            Err(ExtractionError::NonPositiveAmount(Decimal::new(0, 2)))
        );
        assert_eq!(
            ParsedExpense::new(Decimal::ONE, "X", Category::Health, date(), "Bank SMS", 1.2, ""),
            Err(ExtractionError::ConfidenceOutOfRange(1.2))
        );
        assert_eq!(
            ParsedExpense::new(Decimal::ONE, "  ", Category::Health, date(), "Bank SMS", 0.5, ""),
            Err(ExtractionError::MissingField("merchant"))
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let expense = ParsedExpense::new(
            Decimal::new(66470, 2),
            "Food Order",
            Category::FoodAndDining,
            date(),
            "Swiggy",
            0.85,
            "paid ₹664.70",
        )
        .unwrap();

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["category"], "Food & Dining");
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["rawText"], "paid ₹664.70");
        assert_eq!(json["date"], "2026-01-11T00:00:00Z");
    }

    #[test]
    fn test_deserialize_round_trip() {
        let expense = ParsedExpense::new(
            Decimal::new(66470, 2),
            "Food Order",
            Category::FoodAndDining,
            date(),
            "Swiggy",
            0.85,
            "paid ₹664.70",
        )
        .unwrap();

        let json = serde_json::to_string(&expense).unwrap();
        assert_eq!(serde_json::from_str::<ParsedExpense>(&json).unwrap(), expense);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let record = |amount: &str, merchant: &str, confidence: f32| {
            serde_json::json!({
                "amount": amount,
                "currency": "INR",
                "merchant": merchant,
                "category": "Shopping",
                "date": "2026-01-11T00:00:00Z",
                "source": "GPay",
                "confidence": confidence,
                "rawText": "",
            })
        };

        let ok: ParsedExpense = serde_json::from_value(record("450", "Sharma Stores", 0.85)).unwrap();
        assert_eq!(ok.amount().to_string(), "450.00");

        let negative = serde_json::from_value::<ParsedExpense>(record("-5", "Sharma Stores", 0.85));
        assert!(negative.unwrap_err().to_string().contains("positive"));

        assert!(serde_json::from_value::<ParsedExpense>(record("450", " ", 0.85)).is_err());
        assert!(serde_json::from_value::<ParsedExpense>(record("450", "Sharma Stores", 1.5)).is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("food & dining".parse::<Category>(), Ok(Category::FoodAndDining));
        assert_eq!("Groceries".parse::<Category>(), Ok(Category::Groceries));
        assert!("Travel".parse::<Category>().is_err());
    }

    #[test]
    fn test_record_review_flag() {
        let expense = ParsedExpense::new(
            Decimal::from(100),
            UNKNOWN_MERCHANT,
            Category::Miscellaneous,
            date(),
            "GPay",
            0.6,
            "",
        )
        .unwrap();

        let record = ExpenseRecord::new("abc123", expense, 0.75);
        assert!(record.needs_review);
        assert_eq!(record.id, "abc123");
    }
}
