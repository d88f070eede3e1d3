//! Ordered keyword tables. Lookups walk each table front to back and the first hit wins.

use crate::models::Category;

use super::text::{has_any, matches_keyword};

/// A category rule keyed on the merchant name and, optionally, the whole receipt text.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub merchant_keys: &'static [&'static str],
    pub text_keys: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, merchant: &str, text: &str) -> bool {
        has_any(merchant, self.merchant_keys) || has_any(text, self.text_keys)
    }
}

/// Category rules for UPI receipts.
pub const UPI_CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Utilities,
        merchant_keys: &["vi", "vi prepaid", "jio", "airtel", "bsnl"],
        text_keys: &["recharge", "prepaid"],
    },
    CategoryRule {
        category: Category::Subscriptions,
        merchant_keys: &["apple", "netflix", "spotify", "amazon prime", "youtube"],
        text_keys: &["subscription"],
    },
    CategoryRule {
        category: Category::FoodAndDining,
        merchant_keys: &[
            "hotel",
            "restaurant",
            "cafe",
            "food",
            "kitchen",
            "biryani",
            "pizza",
            "burger",
        ],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Shopping,
        merchant_keys: &["mart", "store", "shop", "mall", "retail"],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Transport,
        merchant_keys: &["uber", "ola", "rapido", "metro", "petrol", "fuel"],
        text_keys: &[],
    },
];

/// Category rules for bank SMS, keyed on the cleaned merchant only.
pub const SMS_CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::FoodAndDining,
        merchant_keys: &[
            "swiggy",
            "zomato",
            "dominos",
            "pizza",
            "mcdonald",
            "kfc",
            "starbucks",
            "cafe",
        ],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Groceries,
        merchant_keys: &[
            "bigbasket",
            "blinkit",
            "zepto",
            "instamart",
            "grofers",
            "jiomart",
            "dmart",
        ],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Shopping,
        merchant_keys: &["amazon", "flipkart", "myntra", "ajio", "nykaa", "meesho"],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Transport,
        merchant_keys: &["uber", "ola", "rapido", "metro", "irctc", "redbus"],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Utilities,
        merchant_keys: &[
            "electricity",
            "water",
            "gas",
            "bill",
            "recharge",
            "airtel",
            "jio",
            "vi",
            "bsnl",
        ],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Entertainment,
        merchant_keys: &[
            "netflix",
            "prime",
            "hotstar",
            "spotify",
            "youtube",
            "bookmyshow",
            "pvr",
            "inox",
        ],
        text_keys: &[],
    },
    CategoryRule {
        category: Category::Health,
        merchant_keys: &[
            "pharma",
            "medical",
            "hospital",
            "clinic",
            "apollo",
            "1mg",
            "netmeds",
            "practo",
        ],
        text_keys: &[],
    },
];

/// Resolve a category from an ordered rule table. Both inputs must be lowercase.
pub fn categorize(rules: &[CategoryRule], merchant: &str, text: &str) -> Category {
    rules
        .iter()
        .find(|rule| rule.matches(merchant, text))
        .map(|rule| rule.category)
        .unwrap_or_default()
}

/// Bank detection keys and display names.
pub const BANKS: &[(&[&str], &str)] = &[
    (&["icici"], "ICICI Bank"),
    (&["hdfc"], "HDFC Bank"),
    (&["federal bank"], "Federal Bank"),
    (&["sbi", "state bank"], "SBI"),
    (&["axis"], "Axis Bank"),
    (&["kotak"], "Kotak Bank"),
    (&["idfc"], "IDFC Bank"),
    (&["yes bank"], "Yes Bank"),
    (&["indusind"], "IndusInd Bank"),
    (&["bob", "bank of baroda"], "Bank of Baroda"),
    (&["pnb", "punjab national"], "PNB"),
    (&["canara"], "Canara Bank"),
    (&["union bank"], "Union Bank"),
    (&["rbl"], "RBL Bank"),
];

/// Display name of the first bank mentioned in lowercase `text`.
pub fn detect_bank(text: &str) -> Option<&'static str> {
    BANKS
        .iter()
        .find(|(keys, _)| has_any(text, keys))
        .map(|(_, name)| *name)
}

/// Canonical merchant names for well-known brands.
pub const MERCHANT_ALIASES: &[(&str, &str)] = &[
    ("amazon pay", "Amazon"),
    ("swiggy", "Swiggy"),
    ("zomato", "Zomato"),
    ("paytm", "Paytm"),
    ("phonepe", "PhonePe"),
    ("gpay", "Google Pay"),
    ("google pay", "Google Pay"),
    ("flipkart", "Flipkart"),
    ("myntra", "Myntra"),
    ("uber", "Uber"),
    ("ola", "Ola"),
    ("bigbasket", "BigBasket"),
    ("blinkit", "Blinkit"),
    ("zepto", "Zepto"),
];

/// Canonical name for a lowercase merchant string, if it names a known brand.
pub fn canonical_merchant(merchant: &str) -> Option<&'static str> {
    MERCHANT_ALIASES
        .iter()
        .find(|(key, _)| matches_keyword(merchant, key))
        .map(|(_, name)| *name)
}

/// Payment apps other than the default.
pub const PAYMENT_APPS: &[(&str, &str)] = &[
    ("phonepe", "PhonePe"),
    ("paytm", "Paytm"),
    ("bhim", "BHIM"),
    ("amazon pay", "Amazon Pay"),
];

pub const DEFAULT_PAYMENT_APP: &str = "GPay";

/// Payment app that produced a lowercase receipt text.
pub fn detect_payment_app(text: &str) -> &'static str {
    PAYMENT_APPS
        .iter()
        .find(|(key, _)| matches_keyword(text, key))
        .map(|(_, name)| *name)
        .unwrap_or(DEFAULT_PAYMENT_APP)
}

/// Vocabulary marking a line that carries a payment amount.
pub const AMOUNT_CONTEXT: &[&str] = &[
    "items", "total", "paid", "bill", "price", "fee", "amount", "pay",
];

/// Vocabulary marking an address line, where 6-digit numbers are PIN codes.
pub const GEO_CONTEXT: &[&str] = &[
    "india",
    "pin",
    "pincode",
    "road",
    "nagar",
    "street",
    "colony",
    "layout",
    "sector",
    "kerala",
    "karnataka",
    "tamil nadu",
    "maharashtra",
    "telangana",
    "delhi",
    "mumbai",
    "bengaluru",
    "bangalore",
    "chennai",
    "hyderabad",
    "kolkata",
    "pune",
    "kochi",
];
