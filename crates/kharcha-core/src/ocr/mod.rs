//! OCR text post-processing.
//!
//! The OCR engine itself lives outside this crate; it hands over an [`OcrOutput`] and
//! everything from there on is plain text processing.

mod normalize;
mod repair;

pub use normalize::{normalize, split_lines};
pub use repair::{mask_non_amounts, normalize_ocr, repair_amounts, AmountRepairer};

use serde::{Deserialize, Serialize};

/// Text recognized from one screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Recognized text, lines separated by newlines.
    pub text: String,

    /// Engine confidence score (0.0 - 1.0).
    #[serde(default)]
    pub confidence: f32,
}

impl OcrOutput {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Run both passes: [`normalize`] then repair and masking.
pub fn preprocess(raw: &str, repairer: &AmountRepairer) -> String {
    repairer.normalize_ocr(&normalize(raw))
}
