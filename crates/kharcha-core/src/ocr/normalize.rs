//! First-pass cleanup of raw OCR text.

use crate::parser::rules::patterns::{ALNUM_TOKEN, CURRENCY_TOKEN, HORIZONTAL_WS, PIPE_RUN};

/// Canonicalize raw OCR text.
///
/// Line endings become `\n`, horizontal whitespace collapses to one space, blank lines
/// are dropped. Misread characters are fixed only where the surrounding characters make
/// the reading unambiguous, and every currency marker becomes `₹`. The result is a fixed
/// point: normalizing it again returns it unchanged.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    unified
        .split('\n')
        .map(|line| HORIZONTAL_WS.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .map(clean_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-empty trimmed lines of `text`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

// The fixes feed each other ("rs5O" -> "₹5O" -> "₹50"), so run them to a fixed point.
// Every pass that changes the line removes a pipe, an O or a currency word.
fn clean_line(line: String) -> String {
    let mut current = line;
    loop {
        let next = unify_currency(&fix_zero_tokens(&fix_pipes(&current)));
        if next == current {
            return next;
        }
        current = next;
    }
}

// "W|LD" -> "WILD": a pipe run between letters is a misread capital I.
fn fix_pipes(line: &str) -> String {
    PIPE_RUN
        .replace_all(line, |caps: &regex::Captures| {
            let run = &caps[0];
            let (start, end) = caps
                .get(0)
                .map(|m| (m.start(), m.end()))
                .unwrap_or_default();

            let before = line[..start].chars().next_back();
            let after = line[end..].chars().next();
            let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
            let is_letter = |c: Option<char>| c.is_some_and(char::is_alphabetic);

            if !is_digit(before) && !is_digit(after) && (is_letter(before) || is_letter(after)) {
                "I".repeat(run.len())
            } else {
                run.to_string()
            }
        })
        .into_owned()
}

// "1O5.OO" -> "105.00": a token whose only letters are O/o and that carries a digit.
fn fix_zero_tokens(line: &str) -> String {
    ALNUM_TOKEN
        .replace_all(line, |caps: &regex::Captures| {
            let token = &caps[0];
            let has_digit = token.chars().any(|c| c.is_ascii_digit());
            let only_o = token
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(|c| c == 'O' || c == 'o');

            if has_digit && only_o {
                token.replace(['O', 'o'], "0")
            } else {
                token.to_string()
            }
        })
        .into_owned()
}

// "Rs. 500", "INR: 1,250", "(Rs)" -> "₹500", "₹1,250", "(₹)". A textual marker
// followed by a letter is a word ("RS Aggarwal") unless a number precedes it.
fn unify_currency(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;

    for caps in CURRENCY_TOKEN.captures_iter(line) {
        let (Some(whole), Some(sym), Some(sep)) = (caps.get(0), caps.name("sym"), caps.name("sep"))
        else {
            continue;
        };

        let next = line[whole.end()..].chars().next();
        let next_is_digit = next.is_some_and(|c| c.is_ascii_digit());
        let next_is_letter = next.is_some_and(char::is_alphabetic);
        let prev_is_digit = line[..whole.start()]
            .trim_end()
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());

        let replace = if sym.as_str() == "₹" {
            true
        } else if sep.is_empty() && !sym.as_str().ends_with('.') && next_is_letter {
            // Prefix of a longer word ("inrange").
            false
        } else {
            !next_is_letter || prev_is_digit
        };

        if !replace {
            continue;
        }

        out.push_str(&line[last..whole.start()]);
        out.push('₹');
        if !next_is_digit {
            out.push_str(sep.as_str());
        }
        last = whole.end();
    }

    out.push_str(&line[last..]);
    out
}
