//! Configuration structures for the extraction pipeline.
//!
//! Every numeric range used by the OCR repair heuristics and the extractor cascades
//! lives here. The defaults are tuned to observed OCR failure modes and are meant to
//! be recalibrated, not treated as derived constants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, KharchaError};

/// Main configuration for the kharcha pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KharchaConfig {
    /// OCR amount repair configuration.
    pub repair: RepairConfig,

    /// Extractor configuration.
    pub extraction: ExtractionConfig,
}

/// A closed or open numeric interval over amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl AmountRange {
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Inclusive membership.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// Exclusive membership.
    pub fn contains_strict(&self, value: Decimal) -> bool {
        value > self.min && value < self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min >= self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// OCR amount repair configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Label-adjacent integers at or above this value are suspected of a lost decimal.
    pub bare_amount_threshold: Decimal,

    /// Values strictly inside this range look like a payment amount.
    pub plausible: AmountRange,

    /// Accepted range for values recovered by stripping a misread currency glyph.
    pub misread: AmountRange,

    /// Digits commonly produced when OCR misreads the rupee glyph.
    pub confusable_digits: Vec<char>,

    /// Four-digit values in this range are treated as years, never as misreads.
    pub year_like: AmountRange,

    /// Replacement for numbers that must never be read as amounts.
    pub mask_placeholder: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            bare_amount_threshold: Decimal::from(10_000),
            plausible: AmountRange::new(Decimal::ONE, Decimal::from(10_000)),
            misread: AmountRange::new(Decimal::from(50), Decimal::from(5_000)),
            confusable_digits: vec!['2', '3'],
            year_like: AmountRange::new(Decimal::from(2020), Decimal::from(2039)),
            mask_placeholder: "____".to_string(),
        }
    }
}

impl RepairConfig {
    /// Check the configuration for values that would corrupt extraction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plausible.validate("repair.plausible")?;
        self.misread.validate("repair.misread")?;
        self.year_like.validate("repair.year_like")?;

        if self.mask_placeholder.is_empty()
            || self.mask_placeholder.chars().any(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidPlaceholder(self.mask_placeholder.clone()));
        }

        if let Some(c) = self.confusable_digits.iter().find(|c| !c.is_ascii_digit()) {
            return Err(ConfigError::InvalidConfusableDigit(*c));
        }

        Ok(())
    }

    /// Whether `c` is a digit OCR produces for a misread currency glyph.
    pub fn is_confusable(&self, c: char) -> bool {
        self.confusable_digits.contains(&c)
    }
}

/// Extractor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Inputs shorter than this (after trimming) are treated as OCR noise.
    pub min_text_length: usize,

    /// Records below this confidence are flagged for manual review.
    pub review_threshold: f32,

    /// Fallback range for UPI receipts.
    pub upi_fallback: AmountRange,

    /// Fallback range for food-delivery receipts.
    pub food_fallback: AmountRange,

    /// Fallback range for quick-commerce receipts.
    pub quick_commerce_fallback: AmountRange,

    /// Whole-number values in this range are treated as years during selection.
    pub year_exclusion: AmountRange,

    /// Bank SMS amounts at or above this value are balance displays.
    pub sms_max_amount: Decimal,

    /// Re-check amounts for a rupee glyph misread as a leading digit.
    pub fix_misread_currency: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 10,
            review_threshold: 0.75,
            upi_fallback: AmountRange::new(Decimal::from(50), Decimal::from(10_000)),
            food_fallback: AmountRange::new(Decimal::from(50), Decimal::from(10_000)),
            quick_commerce_fallback: AmountRange::new(Decimal::from(50), Decimal::from(50_000)),
            year_exclusion: AmountRange::new(Decimal::from(2020), Decimal::from(2030)),
            sms_max_amount: Decimal::from(1_000_000),
            fix_misread_currency: true,
        }
    }
}

impl ExtractionConfig {
    /// Check the configuration for inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upi_fallback.validate("extraction.upi_fallback")?;
        self.food_fallback.validate("extraction.food_fallback")?;
        self.quick_commerce_fallback
            .validate("extraction.quick_commerce_fallback")?;
        self.year_exclusion.validate("extraction.year_exclusion")?;

        if !(0.0..=1.0).contains(&self.review_threshold) {
            return Err(ConfigError::OutOfBounds {
                field: "extraction.review_threshold",
                value: self.review_threshold,
                min: 0.0,
                max: 1.0,
            });
        }

        Ok(())
    }
}

impl KharchaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, KharchaError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), KharchaError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repair.validate()?;
        self.extraction.validate()
    }

    /// Default location of the user configuration file below `config_dir`.
    pub fn default_path(config_dir: &Path) -> PathBuf {
        config_dir.join("kharcha").join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        assert!(KharchaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_placeholder_with_digits_is_rejected() {
        let mut config = KharchaConfig::default();
        config.repair.mask_placeholder = "XX0".to_string();

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPlaceholder("XX0".to_string()))
        );
    }

    #[test]
    fn test_swapped_range_is_rejected() {
        let mut config = KharchaConfig::default();
        config.extraction.food_fallback = AmountRange::new(Decimal::from(100), Decimal::from(10));

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "extraction.food_fallback", .. })
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = KharchaConfig::default();
        config.extraction.review_threshold = 0.6;
        config.save(&path).unwrap();

        let loaded = KharchaConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: KharchaConfig =
            serde_json::from_str(r#"{"extraction": {"min_text_length": 4}}"#).unwrap();

        assert_eq!(config.extraction.min_text_length, 4);
        assert_eq!(config.repair, RepairConfig::default());
    }

    #[test]
    fn test_range_membership() {
        let range = AmountRange::new(Decimal::ONE, Decimal::from(10_000));
        assert!(range.contains(Decimal::ONE));
        assert!(!range.contains_strict(Decimal::ONE));
        assert!(range.contains_strict(Decimal::new(61200, 2)));
    }
}
