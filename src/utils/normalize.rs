// src/utils/normalize.rs

//! Normalization helpers for scraped field text.
//!
//! Pure functions: age strings to minutes, pay-rate strings to integer
//! rates, description text to collapsed newlines.

use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::error::{AppError, Result};

/// Fallback age for text the site shows without an exact offset.
/// The site never displays an exact age past ~7 days, so anything
/// unrecognizable is treated as at least a week old.
pub const AGE_CEILING_MINUTES: u32 = 7 * 24 * 60;

/// Convert a job age display string to minutes, aged against today.
///
/// Accepts relative offsets ("13m", "2h", "3d") and bare calendar dates
/// ("Jun 14") for listings older than the relative-display threshold.
pub fn age_to_minutes(text: &str) -> Result<u32> {
    age_to_minutes_at(text, Local::now().date_naive())
}

/// `age_to_minutes` against an explicit `today`, for deterministic tests.
pub fn age_to_minutes_at(text: &str, today: NaiveDate) -> Result<u32> {
    let text = text.trim();
    let Some(last) = text.chars().next_back() else {
        return Ok(AGE_CEILING_MINUTES);
    };

    if last.is_ascii_digit() {
        // A trailing digit means a calendar date ("Jun 14"), not an offset.
        return Ok(parse_month_day(text, today)
            .map(|date| {
                let days = (today - date).num_days().max(0) as u32;
                days * 24 * 60
            })
            .unwrap_or(AGE_CEILING_MINUTES));
    }

    let count: u32 = text[..text.len() - last.len_utf8()]
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_input("age", text))?;
    match last {
        'm' => Ok(count),
        'h' => Ok(60 * count),
        'd' => Ok(24 * 60 * count),
        _ => Ok(AGE_CEILING_MINUTES),
    }
}

/// Parse a "%b %d" date. The string carries no year; a date that would
/// land after `today` is taken to be from the previous year.
fn parse_month_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = format!("{text} {}", today.year());
    let date = NaiveDate::parse_from_str(&this_year, "%b %d %Y").ok()?;
    if date > today {
        let last_year = format!("{text} {}", today.year() - 1);
        return NaiveDate::parse_from_str(&last_year, "%b %d %Y").ok();
    }
    Some(date)
}

/// Parse a suggested pay rate string ("Recommended rate: $19/hr").
///
/// The literal "None" maps to `Ok(None)`; any other non-numeric remainder
/// is an error.
pub fn parse_pay_rate(text: &str) -> Result<Option<u32>> {
    let rate = text
        .trim()
        .trim_start_matches("Recommended rate:")
        .trim_end_matches("/hr")
        .replace('$', "");
    let rate = rate.trim();

    if rate == "None" {
        return Ok(None);
    }
    rate.parse()
        .map(Some)
        .map_err(|_| AppError::invalid_input("pay rate", text))
}

/// Collapse runs of 2+ consecutive line-ending sequences into a single
/// newline and trim surrounding whitespace. Idempotent.
pub fn normalize_description(text: &str) -> String {
    static NEWLINE_RUNS: OnceLock<Regex> = OnceLock::new();
    let pattern = NEWLINE_RUNS.get_or_init(|| {
        Regex::new(r"(?:\r\n|\r|\n){2,}").expect("newline-run pattern is valid")
    });
    pattern.replace_all(text, "\n").trim().to_string()
}
