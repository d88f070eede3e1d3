//! Food delivery receipts (Swiggy, Zomato).

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::cascade::{select_amount, CascadeOptions};
use super::rules::amounts::AmountOptions;
use super::rules::dates::parse_date;
use super::rules::patterns::{FOOD_LABEL_AMOUNT, QUANTITY_MARKER};
use super::rules::text::{has_any, has_any_word, title_case, trim_ocr_noise};
use super::{ExpenseExtractor, ReceiptText};
use crate::models::{Category, ExtractionConfig, ParsedExpense, RepairConfig};

lazy_static! {
    static ref STATUS_LINE: Regex =
        Regex::new(r"your order|order details|order was|delivered|support|help|bill").unwrap();

    static ref ORDER_ID: Regex = Regex::new(r"order\s*(?:id|#)|#\d{5,}").unwrap();

    static ref PRICE_LINE: Regex = Regex::new(r"₹|\brs\.?|\d{3,}").unwrap();

    static ref DAY_MONTH: Regex =
        Regex::new(r"\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)").unwrap();

    static ref RESTAURANT_NAME: Regex = Regex::new(r"^[a-z][a-z\s.'&()-]{2,34}$").unwrap();

    static ref FROM_NAME: Regex = Regex::new(r"\bfrom +([a-z][a-z .&']{2,25})").unwrap();

    static ref BUSINESS_SUFFIX: Regex = Regex::new(
        r"\b([a-z][a-z'&.]*(?: +[a-z][a-z'&.]*){0,3} +(?:dhaba|hotel|kitchen|cafe|restaurant|biryani|foods))\b"
    ).unwrap();
}

const LABELS: &[&str] = &["bill total", "grand total", "amount paid", "paid", "total"];

const NOISE: &[&str] = &["packaging", "handling", "free"];

const APP_CHROME: &[&str] = &["swiggy", "zomato", "reorder", "rate", "track", "invoice"];

const LOCATIONS: &[&str] = &[
    "kakkanad",
    "kochi",
    "kerala",
    "india",
    "infopark",
    "road",
    "tower",
    "building",
    "street",
    "nagar",
];

const DEFAULT_RESTAURANT: &str = "Food Order";

/// Swiggy and Zomato order extractor.
pub struct FoodDeliveryExtractor {
    cascade: CascadeOptions,
}

impl FoodDeliveryExtractor {
    pub fn new(repair: &RepairConfig, extraction: &ExtractionConfig) -> Self {
        Self {
            cascade: CascadeOptions {
                labels: LABELS,
                label_amount: &FOOD_LABEL_AMOUNT,
                noise: NOISE,
                fallback: extraction.food_fallback,
                year_exclusion: extraction.year_exclusion,
                amounts: AmountOptions::from_repair(repair)
                    .with_fix_misread(extraction.fix_misread_currency),
            },
        }
    }
}

impl Default for FoodDeliveryExtractor {
    fn default() -> Self {
        Self::new(&RepairConfig::default(), &ExtractionConfig::default())
    }
}

fn is_restaurant_line(line: &str) -> bool {
    !(STATUS_LINE.is_match(line)
        || ORDER_ID.is_match(line)
        || PRICE_LINE.is_match(line)
        || QUANTITY_MARKER.is_match(line)
        || DAY_MONTH.is_match(line)
        || has_any(line, LOCATIONS)
        || has_any_word(line, APP_CHROME))
        && RESTAURANT_NAME.is_match(line)
}

fn restaurant(input: &ReceiptText<'_>) -> String {
    let header = input
        .lines
        .iter()
        .take(15)
        .map(|line| trim_ocr_noise(line))
        .find(|line| is_restaurant_line(line));
    if let Some(name) = header {
        debug!("Restaurant from header: {}", name);
        return title_case(name);
    }

    if let Some(caps) = FROM_NAME.captures(input.text) {
        debug!("Restaurant from 'from' phrase: {}", &caps[1]);
        return title_case(caps[1].trim());
    }

    if let Some(caps) = BUSINESS_SUFFIX.captures(input.text) {
        debug!("Restaurant from business suffix: {}", &caps[1]);
        return title_case(caps[1].trim());
    }

    debug!("Restaurant not found");
    DEFAULT_RESTAURANT.to_string()
}

fn source(text: &str) -> &'static str {
    if text.contains("zomato") {
        "Zomato"
    } else if text.contains("swiggy") || text.contains("reorder") {
        "Swiggy"
    } else {
        "Food Delivery"
    }
}

impl ExpenseExtractor for FoodDeliveryExtractor {
    fn name(&self) -> &'static str {
        "food_delivery"
    }

    fn extract(&self, input: &ReceiptText<'_>) -> Option<ParsedExpense> {
        let (amount, strategy) = select_amount(input, &self.cascade)?;
        let merchant = restaurant(input);
        debug!("Food result: amount={} via {}, merchant={}", amount, strategy, merchant);

        ParsedExpense::new(
            amount,
            merchant,
            Category::FoodAndDining,
            parse_date(input.text).unwrap_or(input.now),
            source(input.text),
            0.85,
            input.text,
        )
        .inspect_err(|e| debug!("Rejected food record: {}", e))
        .ok()
    }
}
