//! Rule-based field extractors shared by the receipt and SMS parsers.

pub mod amounts;
pub mod dates;
pub mod keywords;
pub mod patterns;
pub mod text;

pub use amounts::{
    extract_amounts, fix_lost_decimal, fix_misread_amount, is_year_like, AmountExtractor,
    AmountOptions,
};
pub use dates::{parse_date, parse_sms_date, DateExtractor};
pub use text::{has_any, title_case};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
