//! Second-pass OCR repair for currency amounts.
//!
//! Runs on normalized text, before lowercasing (the glyph-as-letter fix looks for
//! uppercase `R`, `I`, `F`). Repair always runs before masking, and masking never
//! touches a number directly preceded by `₹`.

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::models::RepairConfig;
use crate::parser::rules::amounts::{reinsert_decimal, AmountOptions};
use crate::parser::rules::keywords::{AMOUNT_CONTEXT, GEO_CONTEXT};
use crate::parser::rules::patterns::{
    GLYPH_AS_DIGIT, GLYPH_AS_DIGIT_LOST_DECIMAL, GLYPH_AS_LETTER, LABELED_LOST_DECIMAL,
    LONG_ID, MONTH_BEFORE_YEAR, PHONE, PIN_CODE, YEAR,
};
use crate::parser::rules::text::{has_any, has_any_word};

/// Repairs mangled amounts and masks numbers that must never be read as amounts.
#[derive(Debug, Clone)]
pub struct AmountRepairer {
    config: RepairConfig,
    amounts: AmountOptions,
}

impl AmountRepairer {
    pub fn new(config: RepairConfig) -> Self {
        let amounts = AmountOptions::from_repair(&config);
        Self { config, amounts }
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Repair then mask.
    pub fn normalize_ocr(&self, text: &str) -> String {
        self.mask(&self.repair(text))
    }

    /// Rewrite amounts damaged by OCR as `₹<amount>`.
    pub fn repair(&self, text: &str) -> String {
        let labeled = LABELED_LOST_DECIMAL.replace_all(text, |caps: &Captures| self.repair_labeled(caps));

        labeled
            .split('\n')
            .map(|line| self.repair_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace years, long identifiers, phone numbers and PIN codes with the placeholder.
    pub fn mask(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| self.mask_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_plausible(&self, value: Decimal) -> bool {
        self.config.plausible.contains_strict(value)
    }

    // "total amount 61200" -> "total amount ₹612.00"
    fn repair_labeled(&self, caps: &Captures<'_>) -> String {
        let whole = caps[0].to_string();
        if caps.get(3).is_some() {
            return whole;
        }

        let label = &caps[1];
        let digits = &caps[2];
        let Ok(value) = Decimal::from_str(digits) else {
            return whole;
        };
        if value < self.config.bare_amount_threshold {
            return whole;
        }

        let stripped = &digits[1..];
        let candidate = reinsert_decimal(digits)
            .filter(|v| self.is_plausible(*v))
            .or_else(|| {
                let value = if stripped.len() > 2 {
                    reinsert_decimal(stripped)
                } else {
                    Decimal::from_str(stripped).ok()
                };
                value.filter(|v| self.is_plausible(*v))
            });

        match candidate {
            Some(amount) => {
                debug!("Lost decimal after '{}': {} -> ₹{}", label, digits, amount);
                format!("{label} ₹{amount}")
            }
            None => whole,
        }
    }

    fn repair_line(&self, line: &str) -> String {
        let lower = line.to_lowercase();
        // Numbers on address lines are PIN codes, never amounts with a lost glyph.
        let is_address = has_any(&lower, GEO_CONTEXT);
        let has_context = has_any_word(&lower, AMOUNT_CONTEXT) && !is_address;
        let trimmed = line.trim();

        // "R299" -> "₹299"
        let step = GLYPH_AS_LETTER
            .replace_all(line, |caps: &Captures| {
                let token = &caps[0];
                if !has_context && token != trimmed {
                    return token.to_string();
                }
                match Decimal::from_str(&caps[2]) {
                    Ok(value) if self.is_plausible(value) => {
                        debug!("Currency glyph read as '{}': {} -> ₹{}", &caps[1], token, &caps[2]);
                        format!("₹{}", &caps[2])
                    }
                    _ => token.to_string(),
                }
            })
            .into_owned();

        // "Paid 3299" -> "Paid ₹299"
        let step = if has_context && !step.contains('₹') {
            GLYPH_AS_DIGIT
                .replace_all(&step, |caps: &Captures| {
                    self.repair_glyph_digit(&step, caps)
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned()
        } else {
            step
        };

        // "366470" -> "₹664.70"
        let trimmed = step.trim().to_string();
        GLYPH_AS_DIGIT_LOST_DECIMAL
            .replace_all(&step, |caps: &Captures| {
                let token = &caps[0];
                if !has_context && token != trimmed {
                    return token.to_string();
                }
                self.repair_glyph_digit_lost_decimal(&step, caps)
                    .unwrap_or_else(|| token.to_string())
            })
            .into_owned()
    }

    fn repair_glyph_digit(&self, line: &str, caps: &Captures<'_>) -> Option<String> {
        let whole = caps.get(0)?;
        let lead = caps[1].chars().next()?;
        if !self.config.is_confusable(lead) || caps[2].starts_with('0') {
            return None;
        }
        if follows_number(line, whole.start()) {
            return None;
        }

        let four = Decimal::from_str(&format!("{}{}", &caps[1], &caps[2])).ok()?;
        if self.config.year_like.contains(four) {
            return None;
        }

        let rest = format!("{}{}", &caps[2], caps.get(3).map_or("", |m| m.as_str()));
        let value = Decimal::from_str(&rest).ok()?;
        if !self.config.misread.contains(value) {
            return None;
        }

        debug!("Currency glyph read as '{}': {} -> ₹{}", lead, whole.as_str(), rest);
        Some(format!("₹{rest}"))
    }

    fn repair_glyph_digit_lost_decimal(&self, line: &str, caps: &Captures<'_>) -> Option<String> {
        let whole = caps.get(0)?;
        if caps.get(3).is_some() || follows_number(line, whole.start()) {
            return None;
        }
        if in_match(&PHONE, line, whole.start()) {
            return None;
        }

        let digits = format!("{}{}", &caps[1], &caps[2]);
        let leading = Decimal::from_str(&digits[..4]).ok()?;
        if self.config.year_like.contains(leading) {
            return None;
        }

        let amount = self
            .amounts
            .fix_lost_decimal(&digits)
            .or_else(|| self.amounts.fix_misread_amount(&digits))?;

        debug!("Currency glyph and decimal lost: {} -> ₹{}", digits, amount);
        Some(format!("₹{amount}"))
    }

    fn mask_line(&self, line: &str) -> String {
        let masked = self.mask_matches(line, &YEAR, "year", is_date_part);
        let masked = self.mask_matches(&masked, &LONG_ID, "identifier", |_, _, _| false);
        let masked = self.mask_matches(&masked, &PHONE, "phone number", |_, _, _| false);

        if has_any(&masked.to_lowercase(), GEO_CONTEXT) {
            self.mask_matches(&masked, &PIN_CODE, "PIN code", |_, _, _| false)
        } else {
            masked
        }
    }

    fn mask_matches(
        &self,
        line: &str,
        pattern: &Regex,
        kind: &str,
        keep: impl Fn(&str, usize, usize) -> bool,
    ) -> String {
        pattern
            .replace_all(line, |caps: &Captures| {
                let Some(m) = caps.get(0) else {
                    return String::new();
                };
                if line[..m.start()].trim_end().ends_with('₹') || keep(line, m.start(), m.end()) {
                    return m.as_str().to_string();
                }
                debug!("Masking {}: {}", kind, m.as_str());
                self.config.mask_placeholder.clone()
            })
            .into_owned()
    }
}

impl Default for AmountRepairer {
    fn default() -> Self {
        Self::new(RepairConfig::default())
    }
}

// Part of a larger number: "1,3299", "₹12.3299", "₹3299".
fn follows_number(line: &str, start: usize) -> bool {
    line[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c == '₹' || c == '.' || c == ',' || c.is_ascii_digit())
}

fn in_match(pattern: &Regex, line: &str, at: usize) -> bool {
    pattern
        .find_iter(line)
        .any(|m| m.start() <= at && at < m.end())
}

// "11 Jan 2026", "Jan 11, 2026", "2026-01-11", "11/01/2026" and "2026.50" keep their digits.
fn is_date_part(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    let mut after = line[end..].chars();
    let next = after.next();

    let separated = |c: Option<char>| matches!(c, Some('-') | Some('/'));
    let decimal = next == Some('.') && after.next().is_some_and(|c| c.is_ascii_digit());
    let inside_number = matches!(before, Some('.') | Some(','));

    separated(before)
        || separated(next)
        || decimal
        || inside_number
        || MONTH_BEFORE_YEAR.is_match(&line[..start])
}

/// Repair mangled amounts with the default configuration.
pub fn repair_amounts(text: &str) -> String {
    AmountRepairer::default().repair(text)
}

/// Mask non-amount numbers with the default configuration.
pub fn mask_non_amounts(text: &str) -> String {
    AmountRepairer::default().mask(text)
}

/// Repair then mask with the default configuration.
pub fn normalize_ocr(text: &str) -> String {
    AmountRepairer::default().normalize_ocr(text)
}
