//! Presence and type checks.

use serde_json::Value;

use crate::error::Diagnostic;
use crate::schema::{rule_fn, BoxedRule};

/// Fails when the attribute is missing.
///
/// An explicit `null`, an empty string or an empty collection all count as
/// present.
pub fn required() -> BoxedRule {
    rule_fn(|value, _, _| match value {
        None => Some(Diagnostic::from("Required")),
        Some(_) => None,
    })
}

/// Builds a rule that fails with `message` unless `accepts` holds.
fn type_check(accepts: fn(&Value) -> bool, message: &'static str) -> BoxedRule {
    rule_fn(move |value, _, _| match value {
        Some(v) if accepts(v) => None,
        _ => Some(Diagnostic::from(message)),
    })
}

pub fn is_string() -> BoxedRule {
    type_check(Value::is_string, "Must be string")
}

pub fn is_number() -> BoxedRule {
    type_check(Value::is_number, "Must be a number")
}

/// Accepts whole numbers, including floats with no fractional part (`6.0`).
pub fn is_integer() -> BoxedRule {
    type_check(is_integral, "Must be an integer")
}

/// Accepts numbers with a fractional part; `1.0` is not a float.
pub fn is_float() -> BoxedRule {
    type_check(
        |v| v.is_number() && !is_integral(v),
        "Must be a float",
    )
}

pub fn is_boolean() -> BoxedRule {
    type_check(Value::is_boolean, "Must be boolean")
}

pub fn is_array() -> BoxedRule {
    type_check(Value::is_array, "Must be an array")
}

/// Accepts JSON objects only; arrays and `null` fail.
pub fn is_plain_object() -> BoxedRule {
    type_check(Value::is_object, "Must be an object")
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;
    use futures::executor::block_on;
    use serde_json::json;

    fn accepts(rule: &BoxedRule, value: Option<Value>) -> bool {
        let whole = json!({});
        block_on(rule.check(value.as_ref(), &whole, &JsonPath::root()))
            .unwrap()
            .is_none()
    }

    fn assert_rule(rule: BoxedRule, valid: Vec<Value>, invalid: Vec<Value>) {
        for value in valid {
            assert!(accepts(&rule, Some(value.clone())), "expected {} to pass", value);
        }
        for value in invalid {
            assert!(!accepts(&rule, Some(value.clone())), "expected {} to fail", value);
        }
    }

    #[test]
    fn test_required() {
        let rule = required();
        assert!(!accepts(&rule, None));
        assert_rule(
            rule,
            vec![json!(null), json!(""), json!(1), json!(1.1), json!({}), json!(true), json!(false), json!([])],
            vec![],
        );
    }

    #[test]
    fn test_is_string() {
        assert!(!accepts(&is_string(), None));
        assert_rule(
            is_string(),
            vec![json!(""), json!("asdasdasd")],
            vec![json!(null), json!(1), json!(1.01), json!(true), json!([])],
        );
    }

    #[test]
    fn test_is_number() {
        assert_rule(
            is_number(),
            vec![json!(-100.01), json!(0), json!(1), json!(100.6)],
            vec![json!(null), json!(""), json!([]), json!(true), json!({})],
        );
    }

    #[test]
    fn test_is_integer() {
        assert!(!accepts(&is_integer(), None));
        assert_rule(
            is_integer(),
            vec![json!(-100), json!(-1), json!(0), json!(10), json!(6.0), json!(u64::MAX)],
            vec![json!(null), json!(""), json!(1.1), json!([]), json!(true), json!("6")],
        );
    }

    #[test]
    fn test_is_float() {
        assert_rule(
            is_float(),
            vec![json!(-100.01), json!(-1.2), json!(0.3), json!(100.6)],
            vec![json!(null), json!(""), json!(1), json!(1.0), json!([]), json!(true)],
        );
    }

    #[test]
    fn test_is_boolean() {
        assert_rule(
            is_boolean(),
            vec![json!(true), json!(false)],
            vec![json!(null), json!(1), json!(""), json!([]), json!({})],
        );
    }

    #[test]
    fn test_is_array() {
        assert!(!accepts(&is_array(), None));
        assert_rule(
            is_array(),
            vec![json!([]), json!([1, "a"])],
            vec![json!(null), json!(""), json!(1), json!({}), json!(true)],
        );
    }

    #[test]
    fn test_is_plain_object() {
        assert_rule(
            is_plain_object(),
            vec![json!({}), json!({ "a": 1 })],
            vec![json!(null), json!(""), json!(1), json!([]), json!(false)],
        );
    }
}
