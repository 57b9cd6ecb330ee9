//! Numeric bounds.
//!
//! Bounds read numbers and numeric strings (`"18"`, `" 2.5 "`). Values that
//! do not read as a number are left to the type checks and pass here.

use serde_json::Value;

use crate::schema::{rule_fn, BoxedRule};

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Fails when the value is below `min`.
pub fn min_value(min: f64) -> BoxedRule {
    rule_fn(move |value, _, _| match value.and_then(numeric) {
        Some(n) if n < min => Some(format!("Must be at least {}", min).into()),
        _ => None,
    })
}

/// Fails when the value is above `max`.
pub fn max_value(max: f64) -> BoxedRule {
    rule_fn(move |value, _, _| match value.and_then(numeric) {
        Some(n) if n > max => Some(format!("Must be at most {}", max).into()),
        _ => None,
    })
}
