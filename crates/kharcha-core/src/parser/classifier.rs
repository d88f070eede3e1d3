//! Screenshot classification from keyword signals.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rules::keywords::BANKS;
use super::rules::text::has_any;

/// Kind of screenshot the OCR text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    UpiReceipt,
    FoodDelivery,
    QuickCommerce,
    Unknown,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpiReceipt => "UPI receipt",
            Self::FoodDelivery => "Food delivery",
            Self::QuickCommerce => "Quick commerce",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const QUICK_COMMERCE_APPS: &[&str] = &["instamart"];

const FOOD_APPS: &[&str] = &[
    "swiggy",
    "zomato",
    "order details",
    "bill summary",
    "reorder",
    "invoice",
    "order summary",
    "your order",
];

const FOOD_INDICATORS: &[&str] = &[
    "delivery fee",
    "delivery partner",
    "platform fee",
    "gst",
    "tax",
    "item total",
    "packaging",
    "restaurant",
];

const UPI_APPS: &[&str] = &[
    "g pay",
    "google pay",
    "gpay",
    "phonepe",
    "paytm",
    "bhim",
    "paid to",
    "upi transaction id",
    "upi ref",
    "upi",
];

const UPI_INDICATORS: &[&str] = &["completed", "successful", "success"];

const QUICK_COMMERCE_TOTALS: &[&str] = &["grand total", "item bill"];

fn has_upi_indicator(text: &str) -> bool {
    has_any(text, UPI_INDICATORS)
        || text.contains('@')
        || BANKS.iter().any(|(keys, _)| has_any(text, keys))
}

/// Classify normalized, lowercased OCR text. The first matching rule wins.
pub fn classify(text: &str) -> DocumentType {
    if has_any(text, QUICK_COMMERCE_APPS) {
        return DocumentType::QuickCommerce;
    }

    let food_app = has_any(text, FOOD_APPS);
    let upi_app = has_any(text, UPI_APPS);

    // A food order paid through UPI carries both signal sets; the food check goes first.
    if food_app && has_any(text, FOOD_INDICATORS) {
        return DocumentType::FoodDelivery;
    }
    if upi_app && has_upi_indicator(text) {
        return DocumentType::UpiReceipt;
    }

    if has_any(text, QUICK_COMMERCE_TOTALS) {
        DocumentType::QuickCommerce
    } else if upi_app {
        DocumentType::UpiReceipt
    } else if food_app {
        DocumentType::FoodDelivery
    } else {
        DocumentType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quick_commerce_wins() {
        assert_eq!(
            classify("swiggy instamart\ngrand total ₹512\npaid via upi"),
            DocumentType::QuickCommerce
        );
    }

    #[test]
    fn test_food_paid_via_upi() {
        let text = "zomato\norder details\nitem total ₹420\ngst ₹21\npaid via upi\ngoogle pay\ncompleted";
        assert_eq!(classify(text), DocumentType::FoodDelivery);
    }

    #[test]
    fn test_upi_receipt() {
        assert_eq!(
            classify("google pay\npaid to vi prepaid\n₹299\ncompleted"),
            DocumentType::UpiReceipt
        );
        assert_eq!(
            classify("to: sharma stores\nfrom: me@okhdfcbank\nupi ref 1234"),
            DocumentType::UpiReceipt
        );
    }

    #[test]
    fn test_weak_fallbacks() {
        assert_eq!(classify("item bill ₹300"), DocumentType::QuickCommerce);
        assert_eq!(classify("phonepe ₹120"), DocumentType::UpiReceipt);
        assert_eq!(
            classify("paid ₹664.70\nswiggy\nbill total ₹664.70\ndelivered"),
            DocumentType::FoodDelivery
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("hello world ₹50"), DocumentType::Unknown);
    }

    #[test]
    fn test_word_keys_need_boundaries() {
        // "tax" inside "taxi" and "upi" inside "cupid" are not signals.
        assert_eq!(classify("cupid taxi ₹200"), DocumentType::Unknown);
    }
}
