//! Date extraction for receipts and bank SMS.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Captures;

use super::patterns::{
    DATE_DAY_MONTH, DATE_ISO, DATE_MONTH_DAY, SMS_DATE_DAY_MONTH, SMS_DATE_MONTH_NAME,
    SMS_DATE_NUMERIC,
};
use super::FieldExtractor;

/// Receipt date extractor.
///
/// Day-first dates ("11 Jan 2026, 8:47 am") take precedence over month-first dates
/// ("Jan 11, 2026"), which take precedence over ISO dates.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDateTime;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_DAY_MONTH.captures_iter(text) {
            let date = month_number(&caps[2]).and_then(|month| {
                NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?)
            });
            push_date(&mut results, &caps, date, Some(4));
        }

        for caps in DATE_MONTH_DAY.captures_iter(text) {
            let date = month_number(&caps[1]).and_then(|month| {
                NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?)
            });
            push_date(&mut results, &caps, date, Some(4));
        }

        for caps in DATE_ISO.captures_iter(text) {
            let date = NaiveDate::from_ymd_opt(
                caps[1].parse().unwrap_or(0),
                caps[2].parse().unwrap_or(0),
                caps[3].parse().unwrap_or(0),
            );
            push_date(&mut results, &caps, date, None);
        }

        results
    }
}

fn push_date(
    results: &mut Vec<NaiveDateTime>,
    caps: &Captures<'_>,
    date: Option<NaiveDate>,
    time_group: Option<usize>,
) {
    let Some(date) = date else {
        return;
    };

    let time = time_group
        .and_then(|group| parse_time(caps, group))
        .unwrap_or(NaiveTime::MIN);
    let value = date.and_time(time);
    if !results.contains(&value) {
        results.push(value);
    }
}

// Groups `first`, `first + 1` and `first + 2` hold hour, minute and the am/pm letter.
fn parse_time(caps: &Captures<'_>, first: usize) -> Option<NaiveTime> {
    let mut hour: u32 = caps.get(first)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(first + 1)?.as_str().parse().ok()?;

    match caps.get(first + 2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(ref meridiem) if meridiem == "p" && hour < 12 => hour += 12,
        Some(ref meridiem) if meridiem == "a" && hour == 12 => hour = 0,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)?.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn expand_year(year: i32) -> i32 {
    if year < 100 { 2000 + year } else { year }
}

/// First receipt date in `text`, interpreted as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    DateExtractor::new().extract(text).map(|value| value.and_utc())
}

/// Parse a date fragment from a bank SMS.
///
/// Accepts `dd-Mon-yy(yy)`, `dd-mm-yy(yy)` and `dd-mm`; the last takes its year from
/// `now`. Two-digit years are in the 2000s.
pub fn parse_sms_date(fragment: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let date = if let Some(caps) = SMS_DATE_MONTH_NAME.captures(fragment) {
        let month = month_number(&caps[2])?;
        NaiveDate::from_ymd_opt(
            expand_year(caps[3].parse().ok()?),
            month,
            caps[1].parse().ok()?,
        )
    } else if let Some(caps) = SMS_DATE_NUMERIC.captures(fragment) {
        NaiveDate::from_ymd_opt(
            expand_year(caps[3].parse().ok()?),
            caps[2].parse().ok()?,
            caps[1].parse().ok()?,
        )
    } else if let Some(caps) = SMS_DATE_DAY_MONTH.captures(fragment) {
        NaiveDate::from_ymd_opt(now.year(), caps[2].parse().ok()?, caps[1].parse().ok()?)
    } else {
        None
    }?;

    Some(date.and_time(NaiveTime::MIN).and_utc())
}
