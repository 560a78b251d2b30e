//! Field-level normalization shared by the prefill and review mappers.

use chrono::NaiveDate;
use serde_json::Value;

/// Splits a full name on its first whitespace boundary.
///
/// Everything after the first token becomes the last name, so
/// `"Ada King Lovelace"` yields `("Ada", "King Lovelace")`.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim_start().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Splits newline-delimited responsibilities into trimmed, non-blank lines.
pub fn responsibilities_to_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn lines_to_responsibilities(lines: &[String]) -> String {
    lines.join("\n")
}

pub fn is_present_token(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("present")
}

/// Normalizes a date into the `YYYY-MM` month representation used by form state.
///
/// Accepts `MM/YYYY` (`M/YYYY` too), bare `YYYY` (January), `YYYY-MM` and
/// `YYYY-MM-DD`. `present` and anything unrecognized normalize to empty.
pub fn normalize_month(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || is_present_token(value) {
        return String::new();
    }

    let parsed = if let Some((month, year)) = value.split_once('/') {
        year_month(year, month)
    } else if value.len() == 4 {
        year_month(value, "1")
    } else {
        let mut parts = value.splitn(3, '-');
        match (parts.next(), parts.next()) {
            (Some(year), Some(month)) => year_month(year, month),
            _ => None,
        }
    };

    parsed
        .map(|(year, month)| format!("{year:04}-{month:02}"))
        .unwrap_or_default()
}

/// Normalizes an end date, returning the month value and whether the position is current.
pub fn normalize_end_date(value: &str) -> (String, bool) {
    if is_present_token(value) {
        (String::new(), true)
    } else {
        (normalize_month(value), false)
    }
}

fn year_month(year: &str, month: &str) -> Option<(i32, u32)> {
    let year = year.trim();
    let month = month.trim();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if month.is_empty() || month.len() > 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

/// Parses a graduation year; absent, blank or non-numeric input is 0.
pub fn parse_graduation_year(value: &str) -> i32 {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| *year > 0)
        .unwrap_or(0)
}

pub fn graduation_year_from_value(value: Option<&Value>) -> i32 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(|year| i32::try_from(year).ok())
            .filter(|year| *year > 0)
            .unwrap_or(0),
        Some(Value::String(text)) => parse_graduation_year(text),
        _ => 0,
    }
}

/// Reads a loosely typed prefill value as form text.
///
/// Arrays (e.g. skills lists) are joined with `", "`; numbers and booleans are
/// stringified; null and objects are treated as absent.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(if *flag { "yes" } else { "no" }.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(value_as_text)
                .filter(|part| !part.trim().is_empty())
                .collect();
            Some(parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Reads a list of strings, accepting either a JSON array or a newline-delimited string.
pub fn value_as_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(value_as_text)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        Value::String(text) => responsibilities_to_lines(text),
        _ => Vec::new(),
    }
}
