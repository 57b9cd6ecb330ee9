//! Built-in rules.
//!
//! Every function here returns a [`BoxedRule`](crate::BoxedRule) usable
//! anywhere a rule is expected. The engine has no special knowledge of them.
//!
//! Rules other than [`required`] and the type checks let a missing value
//! through only where stated; combine them with [`required`] or gate them
//! with [`when`](crate::when) and [`conditions::is_defined`](crate::conditions::is_defined)
//! to make the intent explicit.
//!
//! # Example
//!
//! ```rust
//! use rulebook::{rules, RuleSchema};
//!
//! let signup = RuleSchema::new()
//!     .field("email", [rules::required(), rules::is_email()])
//!     .field("password", [rules::required(), rules::min_length(8)])
//!     .field("repeatPassword", rules::same_as("password"))
//!     .field("age", [rules::is_integer(), rules::min_value(18.0)]);
//! ```

mod compare;
mod numeric;
mod string;
mod types;

use serde_json::Value;

pub use compare::{equals, one_of_array, same_as};
pub use numeric::{max_value, min_value};
pub use string::{is_alpha, is_date, is_email, max_length, min_length};
pub use types::{
    is_array, is_boolean, is_float, is_integer, is_number, is_plain_object, is_string, required,
};

/// Formats a value for a message: strings without quotes, the rest as JSON.
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compares values the way a reader would: `1` equals `1.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!("BMW")), "BMW");
        assert_eq!(describe(&json!(1.5)), "1.5");
        assert_eq!(describe(&json!([1, 2])), "[1,2]");
        assert_eq!(describe(&json!(null)), "null");
    }

    #[test]
    fn test_values_equal() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(1.000001)));
        assert!(values_equal(&json!({ "a": 1 }), &json!({ "a": 1 })));
        assert!(!values_equal(&json!(""), &json!(false)));
        assert!(!values_equal(&json!(0), &json!(false)));
    }
}
