//! Amount extraction for normalized receipt text.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_PREFIXED, AMOUNT_SUFFIXED, BARE_NUMBER};
use super::FieldExtractor;
use crate::models::{AmountRange, RepairConfig};

/// Options for [`extract_amounts`].
#[derive(Debug, Clone, PartialEq)]
pub struct AmountOptions {
    /// Re-check every amount for a rupee glyph misread as a leading digit.
    pub fix_misread: bool,

    /// Range for numbers without a currency marker.
    pub bare_range: AmountRange,

    /// Values strictly inside this range are left alone by the misread fix.
    pub plausible: AmountRange,

    /// Accepted range for values recovered by the misread fix.
    pub misread: AmountRange,

    /// Digits OCR produces for a misread rupee glyph.
    pub confusable_digits: Vec<char>,
}

impl Default for AmountOptions {
    fn default() -> Self {
        Self::from_repair(&RepairConfig::default())
    }
}

impl AmountOptions {
    /// Options sharing the repair layer's ranges, with the misread fix off.
    pub fn from_repair(config: &RepairConfig) -> Self {
        Self {
            fix_misread: false,
            bare_range: AmountRange::new(Decimal::from(10), Decimal::from(100_000)),
            plausible: config.plausible,
            misread: config.misread,
            confusable_digits: config.confusable_digits.clone(),
        }
    }

    pub fn with_fix_misread(mut self, fix_misread: bool) -> Self {
        self.fix_misread = fix_misread;
        self
    }

    fn is_confusable(&self, c: char) -> bool {
        self.confusable_digits.contains(&c)
    }

    /// Strip a leading confusable digit when the remainder is a plausible misread amount.
    pub fn fix_misread_amount(&self, digits: &str) -> Option<Decimal> {
        let mut chars = digits.chars();
        let first = chars.next()?;
        if !self.is_confusable(first) {
            return None;
        }

        let rest = chars.as_str();
        if rest.is_empty() {
            return None;
        }

        let value = Decimal::from_str(rest).ok()?;
        self.misread.contains(value).then_some(value)
    }

    /// Strip a leading confusable digit and reinsert the decimal point two places from
    /// the right of the remainder.
    pub fn fix_lost_decimal(&self, digits: &str) -> Option<Decimal> {
        let mut chars = digits.chars();
        let first = chars.next()?;
        if !self.is_confusable(first) {
            return None;
        }

        let rest = chars.as_str();
        if rest.len() < 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let value = reinsert_decimal(rest)?;
        self.misread.contains(value).then_some(value)
    }

    /// Parse a matched number, applying the misread fix when enabled.
    pub fn resolve(&self, raw: &str) -> Option<Decimal> {
        let parsed = parse_amount(raw)?;
        let value = if self.fix_misread {
            self.repair_misread(&raw.replace(',', ""), parsed)
        } else {
            parsed
        };
        (value > Decimal::ZERO).then_some(value)
    }

    fn repair_misread(&self, raw: &str, value: Decimal) -> Decimal {
        let is_integer = raw.bytes().all(|b| b.is_ascii_digit());
        if !is_integer || !(5..=6).contains(&raw.len()) {
            return value;
        }
        if self.plausible.contains_strict(value) && value <= self.misread.max {
            return value;
        }

        self.fix_lost_decimal(raw)
            .or_else(|| self.fix_misread_amount(raw))
            .unwrap_or(value)
    }
}

/// Insert a decimal point two digits from the right ("61200" -> 612.00).
pub fn reinsert_decimal(digits: &str) -> Option<Decimal> {
    if digits.len() < 3 {
        return None;
    }
    let (whole, cents) = digits.split_at(digits.len() - 2);
    Decimal::from_str(&format!("{whole}.{cents}")).ok()
}

/// Whether a value is a whole number inside `range` (a year rather than an amount).
pub fn is_year_like(value: Decimal, range: &AmountRange) -> bool {
    value.fract().is_zero() && range.contains(value)
}

/// Parse a matched number, dropping thousands separators.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace(',', "");
    Decimal::from_str(cleaned.trim_end_matches('.')).ok()
}

/// Misread fix with the default repair configuration.
pub fn fix_misread_amount(digits: &str) -> Option<Decimal> {
    AmountOptions::default().fix_misread_amount(digits)
}

/// Lost-decimal fix with the default repair configuration.
pub fn fix_lost_decimal(digits: &str) -> Option<Decimal> {
    AmountOptions::default().fix_lost_decimal(digits)
}

/// Amount field extractor.
pub struct AmountExtractor {
    options: AmountOptions,
}

impl AmountExtractor {
    pub fn new(options: AmountOptions) -> Self {
        Self { options }
    }

    fn candidates<'t>(&self, text: &'t str) -> Vec<(usize, &'t str)> {
        let mut found = Vec::new();

        for caps in AMOUNT_PREFIXED.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                found.push((m.start(), m.as_str()));
            }
        }

        for caps in AMOUNT_SUFFIXED.captures_iter(text) {
            let (Some(whole), Some(m)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // Already counted as a prefixed amount.
            if text[..m.start()].trim_end().ends_with('₹') {
                continue;
            }
            // The glyph belongs to the next amount ("qty 2 ₹150").
            if text[whole.end()..].starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            found.push((m.start(), m.as_str()));
        }

        if found.is_empty() {
            for caps in BARE_NUMBER.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    found.push((m.start(), m.as_str()));
                }
            }
            found.retain(|(_, raw)| {
                parse_amount(raw).is_some_and(|v| self.options.bare_range.contains(v))
            });
        }

        found.sort_by_key(|(start, _)| *start);
        found
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new(AmountOptions::default())
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(text)
            .into_iter()
            .filter_map(|(_, raw)| self.options.resolve(raw))
            .collect()
    }
}

/// Extract every amount from `text`, in text order.
pub fn extract_amounts(text: &str, options: &AmountOptions) -> Vec<Decimal> {
    AmountExtractor::new(options.clone()).extract_all(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_prefixed_and_suffixed_amounts_keep_text_order() {
        let amounts = extract_amounts("item 250₹ total ₹1,250.50", &AmountOptions::default());
        assert_eq!(amounts, vec![dec("250"), dec("1250.50")]);
    }

    #[test]
    fn test_suffix_before_next_amount_is_ignored() {
        let amounts = extract_amounts("qty 2 ₹150", &AmountOptions::default());
        assert_eq!(amounts, vec![dec("150")]);
    }

    #[test]
    fn test_bare_numbers_only_without_currency() {
        let options = AmountOptions::default();
        assert_eq!(extract_amounts("total 450 items 3", &options), vec![dec("450")]);
        assert_eq!(extract_amounts("₹99 ref 4500", &options), vec![dec("99")]);
        assert!(extract_amounts("ref 4500000", &options).is_empty());
    }

    #[test]
    fn test_fix_misread_amount_recovers_prefix() {
        for amount in 50..=3000 {
            for prefix in ['2', '3'] {
                let digits = format!("{prefix}{amount}");
                assert_eq!(fix_misread_amount(&digits), Some(Decimal::from(amount)), "{digits}");
            }
        }
    }

    #[test]
    fn test_fix_misread_amount_rejects() {
        assert_eq!(fix_misread_amount("5299"), None);
        assert_eq!(fix_misread_amount("349"), None);
        assert_eq!(fix_misread_amount("2"), None);
    }

    #[test]
    fn test_fix_lost_decimal() {
        assert_eq!(fix_lost_decimal("366470"), Some(dec("664.70")));
        assert_eq!(fix_lost_decimal("23000"), None);
    }

    #[test]
    fn test_extract_with_misread_fix() {
        let options = AmountOptions::default().with_fix_misread(true);
        assert_eq!(extract_amounts("paid ₹366470", &options), vec![dec("664.70")]);
        assert_eq!(extract_amounts("paid ₹23000", &options), vec![dec("3000")]);
        assert_eq!(extract_amounts("paid ₹2999", &options), vec![dec("2999")]);
    }

    #[test]
    fn test_is_year_like() {
        let range = AmountRange::new(Decimal::from(2020), Decimal::from(2030));
        assert!(is_year_like(dec("2026"), &range));
        assert!(!is_year_like(dec("2026.50"), &range));
        assert!(!is_year_like(dec("2031"), &range));
    }

    #[test]
    fn test_amount_extractor_first_in_text_order() {
        let extractor = AmountExtractor::default();
        assert_eq!(extractor.extract("120₹ bill total ₹664.70"), Some(dec("120")));
        assert_eq!(extractor.extract("bill total pending"), None);
    }
}
