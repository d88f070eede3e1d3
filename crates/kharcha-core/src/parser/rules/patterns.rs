//! Common regex patterns for receipt and SMS extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Text normalization
    pub static ref HORIZONTAL_WS: Regex = Regex::new(r"[^\S\n]+").unwrap();

    pub static ref PIPE_RUN: Regex = Regex::new(r"\|+").unwrap();

    pub static ref ALNUM_TOKEN: Regex = Regex::new(r"[A-Za-z0-9.,]+").unwrap();

    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"(?i)(?P<sym>₹|\b(?:rs|inr)\.?)(?P<sep>[ \t]*[:-][ \t]*|[ \t]*)"
    ).unwrap();

    pub static ref TITLE_WORD: Regex = Regex::new(r"\w\S*").unwrap();

    // Amounts in normalized text
    pub static ref AMOUNT_PREFIXED: Regex = Regex::new(
        r"₹\s?(\d[\d,]*(?:\.\d{1,2})?)"
    ).unwrap();

    pub static ref AMOUNT_SUFFIXED: Regex = Regex::new(
        r"(\d[\d,]*(?:\.\d{1,2})?)\s?₹"
    ).unwrap();

    pub static ref BARE_NUMBER: Regex = Regex::new(
        r"\b(\d{3,}(?:\.\d{1,2})?)\b"
    ).unwrap();

    // OCR amount repair
    pub static ref LABELED_LOST_DECIMAL: Regex = Regex::new(
        r"(?i)\b(total amount|bill total|grand total|amount paid|paid|total)[\s:]+(\d{4,7})\b(\.\d)?"
    ).unwrap();

    pub static ref GLYPH_AS_LETTER: Regex = Regex::new(
        r"\b([RIF])(\d{1,5}(?:\.\d{1,2})?)\b"
    ).unwrap();

    pub static ref GLYPH_AS_DIGIT: Regex = Regex::new(
        r"\b(\d)(\d{3})(\.\d{1,2})?\b"
    ).unwrap();

    pub static ref GLYPH_AS_DIGIT_LOST_DECIMAL: Regex = Regex::new(
        r"\b(\d)(\d{4,5})\b(\.\d)?"
    ).unwrap();

    // Masking
    pub static ref YEAR: Regex = Regex::new(r"\b(?:199\d|20[0-3]\d)\b").unwrap();

    pub static ref LONG_ID: Regex = Regex::new(r"\b\d{10,}\b").unwrap();

    pub static ref PHONE: Regex = Regex::new(r"\b\d{5} ?\d{5}\b").unwrap();

    pub static ref PIN_CODE: Regex = Regex::new(r"\b\d{6}\b").unwrap();

    pub static ref MONTH_BEFORE_YEAR: Regex = Regex::new(
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(?:\d{1,2}(?:st|nd|rd|th)?,?\s+)?$"
    ).unwrap();

    // Receipt dates
    pub static ref DATE_DAY_MONTH: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})(?:,?\s*(?:at\s+)?(\d{1,2}):(\d{2})\s*([ap])?\.?m?\.?)?"
    ).unwrap();

    pub static ref DATE_MONTH_DAY: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})(?:,?\s*(?:at\s+)?(\d{1,2}):(\d{2})\s*([ap])?\.?m?\.?)?"
    ).unwrap();

    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})[-/](\d{2})[-/](\d{2})\b"
    ).unwrap();

    pub static ref DATE_SHAPED: Regex = Regex::new(
        r"(?i)\b\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}\b|\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b|\b\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b|\b\d{1,2}:\d{2}(?:\s*[ap]\.?m\.?)?"
    ).unwrap();

    // Label immediately followed by an amount, per receipt type
    pub static ref UPI_LABEL_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:total amount|amount paid|paid|amount)[\s:]*₹?\s*(\d[\d,]*(?:\.\d{1,2})?)"
    ).unwrap();

    pub static ref FOOD_LABEL_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:bill total|grand total|amount paid|paid|total)[\s:]*₹?\s*(\d[\d,]*(?:\.\d{1,2})?)"
    ).unwrap();

    pub static ref QUICK_COMMERCE_LABEL_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:grand total|total|amount paid|paid)[\s:]*₹?\s*(\d[\d,]*(?:\.\d{1,2})?)"
    ).unwrap();

    // Line item quantity markers: "2 x", "x 2", "2x"
    pub static ref QUANTITY_MARKER: Regex = Regex::new(
        r"(?i)^\d+\s*x\s|\bx\s*\d+\b|\b\d+\s*x\b"
    ).unwrap();

    // Bank SMS dates (day-month-year in short forms)
    pub static ref SMS_DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)(\d{1,2})[-/ ]([a-z]{3})[a-z]*[-/ ](\d{2,4})"
    ).unwrap();

    pub static ref SMS_DATE_NUMERIC: Regex = Regex::new(
        r"(\d{1,2})[-/](\d{1,2})[-/](\d{2,4})"
    ).unwrap();

    pub static ref SMS_DATE_DAY_MONTH: Regex = Regex::new(
        r"(\d{1,2})[-/](\d{1,2})$"
    ).unwrap();

    // Contact details
    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();
}
