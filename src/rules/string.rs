//! Pattern and length rules.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Diagnostic;
use crate::schema::{rule_fn, BoxedRule};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]+$").expect("valid regex")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

static ALPHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[a-zA-Z,\-.'"]*$"#).expect("valid regex"));

fn pattern_check(re: &'static LazyLock<Regex>, message: &'static str) -> BoxedRule {
    rule_fn(move |value, _, _| match value {
        Some(Value::String(s)) if re.is_match(s) => None,
        _ => Some(Diagnostic::from(message)),
    })
}

/// Fails unless the value is a string shaped like an email address.
///
/// Matching is case-insensitive; non-strings fail.
pub fn is_email() -> BoxedRule {
    pattern_check(&EMAIL_RE, "Enter valid email address")
}

/// Fails unless the value is a `YYYY-MM-DD` string.
///
/// Only the shape is checked, not the calendar.
pub fn is_date() -> BoxedRule {
    pattern_check(&DATE_RE, "Must be a date in YYYY-MM-DD format")
}

/// Fails unless the value is a string of Latin letters and name punctuation.
pub fn is_alpha() -> BoxedRule {
    pattern_check(&ALPHA_RE, r#"Only letters and ,-.'" are allowed"#)
}

enum Measured {
    Chars(usize),
    Items(usize),
}

fn measure(value: &Value) -> Option<Measured> {
    match value {
        Value::String(s) => Some(Measured::Chars(s.chars().count())),
        Value::Array(items) => Some(Measured::Items(items.len())),
        _ => None,
    }
}

/// Fails when a string has fewer than `min` characters, or an array fewer
/// than `min` items.
///
/// A missing or `null` value passes; other types fail.
pub fn min_length(min: usize) -> BoxedRule {
    rule_fn(move |value, _, _| {
        let value = value.filter(|v| !v.is_null())?;
        match measure(value) {
            Some(Measured::Chars(n)) if n < min => {
                Some(format!("Must be at least {} characters", min).into())
            }
            Some(Measured::Items(n)) if n < min => {
                Some(format!("Must contain at least {} items", min).into())
            }
            Some(_) => None,
            None => Some(Diagnostic::from("Must be a string or an array")),
        }
    })
}

/// Fails when a string has more than `max` characters, or an array more
/// than `max` items.
///
/// A missing or `null` value passes; other types fail.
pub fn max_length(max: usize) -> BoxedRule {
    rule_fn(move |value, _, _| {
        let value = value.filter(|v| !v.is_null())?;
        match measure(value) {
            Some(Measured::Chars(n)) if n > max => {
                Some(format!("Must be no more than {} characters", max).into())
            }
            Some(Measured::Items(n)) if n > max => {
                Some(format!("Must contain no more than {} items", max).into())
            }
            Some(_) => None,
            None => Some(Diagnostic::from("Must be a string or an array")),
        }
    })
}
