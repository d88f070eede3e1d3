//! End-to-end parsing of representative screenshots and SMS.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use kharcha_core::ocr::{mask_non_amounts, repair_amounts};
use kharcha_core::parser::UpiExtractor;
use kharcha_core::{
    Category, DocumentType, ExpenseExtractor, ExpenseParser, ExpenseRecord, KharchaConfig,
    ParsedExpense, ReceiptText,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const SAMPLES: &[&str] = &[
    "Paid ₹664.70\nSwiggy\nBill Total ₹664.70\nDelivered",
    "Google Pay\nPaid to Vi Prepaid\n₹299\nCompleted\n11 Jan 2026",
    "Swiggy Instamart\nItem Bill ₹512\nHandling Fee ₹9\nGrand Total ₹521",
    "PhonePe\nSharma Stores\n₹1,250\nTransaction Successful\n3 Feb 2026, 7:15 pm",
    "ZOMATO\nOrder Details\n» Paradise Biryani ©\nItem Total ₹420\nGST ₹21\nTotal ₹441",
    "Thank you for shopping\n₹349\nsee you soon",
];

#[test]
fn test_swiggy_food_order() {
    let expense = ExpenseParser::default()
        .parse_at("Paid ₹664.70\nSwiggy\nBill Total ₹664.70\nDelivered", now())
        .unwrap();

    assert_eq!(expense.amount(), dec("664.70"));
    assert_eq!(expense.category(), Category::FoodAndDining);
    assert_eq!(expense.source(), "Swiggy");
}

#[test]
fn test_google_pay_recharge() {
    let expense = ExpenseParser::default()
        .parse_at("Google Pay\nPaid to Vi Prepaid\n₹299\nCompleted\n11 Jan 2026", now())
        .unwrap();

    assert_eq!(expense.amount(), Decimal::from(299));
    assert_eq!(expense.merchant(), "Vi Prepaid");
    assert_eq!(expense.category(), Category::Utilities);
    assert_eq!(expense.source(), "GPay");
    assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap());
    assert!(expense.confidence() >= 0.85);
}

#[test]
fn test_failed_upi_payment() {
    let input = ReceiptText::new("failed ₹500", now());
    assert!(UpiExtractor::default().extract(&input).is_none());
}

#[test]
fn test_lost_decimal_is_restored() {
    assert!(repair_amounts("total amount 61200").contains("₹612.00"));

    let parser = ExpenseParser::default();
    assert!(parser.preprocess("Total Amount 61200").contains("₹612.00"));
}

#[test]
fn test_years_and_ids_are_masked() {
    let masked = mask_non_amounts("born in 1990, order id 9988776655");
    assert!(!masked.chars().any(|c| c.is_ascii_digit()), "{masked}");
    assert!(masked.contains("____"));
}

#[test]
fn test_icici_sms() {
    let expense = ExpenseParser::default()
        .parse_sms_at(
            "INR 2664.00 spent using ICICI Bank Card XX9006 on 11-Jan-26 on AMAZON PAY",
            now(),
        )
        .unwrap();

    assert_eq!(expense.amount(), dec("2664.00"));
    assert_eq!(expense.source(), "ICICI Bank");
    assert_eq!(expense.merchant(), "Amazon");
    assert_eq!(expense.date(), Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap());
}

#[test]
fn test_food_paid_via_upi_is_food() {
    let report = ExpenseParser::default().report(
        "Zomato\nOrder Details\nItem Total ₹420\nGST ₹21\nPaid via UPI\nGoogle Pay\nCompleted\nTotal ₹441",
        now(),
    );
    assert_eq!(report.document_type, Some(DocumentType::FoodDelivery));
    assert_eq!(report.expense.unwrap().amount(), Decimal::from(441));
}

#[test]
fn test_address_pin_code_is_not_an_amount() {
    let expense = ExpenseParser::default()
        .parse_at(
            "PhonePe\nPaid to Sharma Stores\nBilling: Noida, Delhi 201301\n₹450\nSuccessful",
            now(),
        )
        .unwrap();

    assert_eq!(expense.amount(), Decimal::from(450));
    assert_eq!(expense.merchant(), "Sharma Stores");
}

#[test]
fn test_textual_currency_with_colon() {
    let expense = ExpenseParser::default()
        .parse_at("Swiggy order\nBill Total Rs: 85", now())
        .unwrap();
    assert_eq!(expense.amount(), Decimal::from(85));

    let expense = ExpenseParser::default()
        .parse_at("Zomato\nGrand Total INR: 1,250\nDelivered", now())
        .unwrap();
    assert_eq!(expense.amount(), Decimal::from(1250));
}

fn assert_invariants(expense: &ParsedExpense) {
    assert!(expense.amount() > Decimal::ZERO);
    assert!((0.0..=1.0).contains(&expense.confidence()));
    assert!(!expense.merchant().trim().is_empty());
    assert!(Category::ALL.contains(&expense.category()));
}

#[test]
fn test_every_record_holds_invariants() {
    let parser = ExpenseParser::default();
    for sample in SAMPLES {
        let expense = parser
            .parse_at(sample, now())
            .unwrap_or_else(|| panic!("no expense for {sample:?}"));
        assert_invariants(&expense);
    }
}

#[test]
fn test_custom_config_is_honored() {
    let mut config = KharchaConfig::default();
    config.extraction.min_text_length = 40;
    let parser = ExpenseParser::new(config);

    assert!(parser.parse_at("Paid ₹664.70\nSwiggy\nDelivered", now()).is_none());
}

#[test]
fn test_record_review_flag() {
    let parser = ExpenseParser::default();
    let confident = parser.parse_at(SAMPLES[1], now()).unwrap();
    let unsure = parser.parse_at("upi payment\n₹80\ncompleted", now()).unwrap();

    let threshold = parser.config().extraction.review_threshold;
    assert!(!ExpenseRecord::new("a1", confident, threshold).needs_review);
    assert!(ExpenseRecord::new("b2", unsure, threshold).needs_review);
}

#[tokio::test]
async fn test_shared_parser_across_tasks() {
    let parser = Arc::new(ExpenseParser::default());

    let handles: Vec<_> = SAMPLES
        .iter()
        .cycle()
        .take(24)
        .map(|sample| {
            let parser = Arc::clone(&parser);
            tokio::task::spawn_blocking(move || parser.parse_at(sample, now()))
        })
        .collect();

    for (handle, sample) in handles.into_iter().zip(SAMPLES.iter().cycle()) {
        let concurrent = handle.await.unwrap();
        assert_eq!(concurrent, parser.parse_at(sample, now()));
    }
}
