//! Small text helpers shared by the classifier and the extractors.

use super::patterns::TITLE_WORD;

/// Convert a string to title case ("VI PREPAID" -> "Vi Prepaid").
pub fn title_case(s: &str) -> String {
    TITLE_WORD
        .replace_all(s, |caps: &regex::Captures| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .into_owned()
}

/// Byte offsets where `word` occurs in `haystack` delimited by non-alphanumeric
/// characters.
pub fn word_starts<'a>(haystack: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack
        .match_indices(word)
        .filter(move |_| !word.is_empty())
        .filter_map(move |(start, _)| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + word.len()..].chars().next();
            let bounded = !before.is_some_and(char::is_alphanumeric)
                && !after.is_some_and(char::is_alphanumeric);
            bounded.then_some(start)
        })
}

/// Whether `word` occurs in `haystack` delimited by non-alphanumeric characters.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    word_starts(haystack, word).next().is_some()
}

/// Keyword lookup used by the lookup tables.
///
/// Keys of three characters or fewer ("ola", "jio", "sbi") must match as whole words,
/// longer keys match as substrings.
pub fn matches_keyword(haystack: &str, key: &str) -> bool {
    if key.chars().count() <= 3 {
        contains_word(haystack, key)
    } else {
        haystack.contains(key)
    }
}

/// Whether any of the keywords occurs in `text` (see [`matches_keyword`]).
pub fn has_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| matches_keyword(text, k))
}

/// Whether any of the keywords occurs in `text` as a whole word or phrase.
pub fn has_any_word(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_word(text, k))
}

/// Strip leading and trailing characters that are neither letters, digits nor
/// closing punctuation commonly found in names.
pub fn trim_ocr_noise(line: &str) -> &str {
    line.trim_matches(|c: char| !(c.is_alphanumeric() || c == '.' || c == ')' || c == '\''))
        .trim()
}
