//! Equality and membership rules.

use serde_json::Value;

use super::{describe, values_equal};
use crate::schema::{rule_fn, BoxedRule};

/// Fails unless the value equals one of `allowed`.
///
/// A missing attribute is never a member.
///
/// # Example
///
/// ```rust
/// use rulebook::rules;
///
/// let make = rules::one_of_array(["BMW", "Mercedes", "Audi"]);
/// let cylinders = rules::one_of_array([4, 6, 8]);
/// ```
pub fn one_of_array<I, V>(allowed: I) -> BoxedRule
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
    let message = format!(
        "Must be one of: {}",
        allowed.iter().map(describe).collect::<Vec<_>>().join(", ")
    );

    rule_fn(move |value, _, _| {
        let found = value.is_some_and(|v| allowed.iter().any(|a| values_equal(a, v)));
        (!found).then(|| message.clone().into())
    })
}

/// Fails unless the value equals `expected`.
pub fn equals(expected: impl Into<Value>) -> BoxedRule {
    let expected = expected.into();
    let message = format!("Must match {}", describe(&expected));

    rule_fn(move |value, _, _| match value {
        Some(v) if values_equal(v, &expected) => None,
        _ => Some(message.clone().into()),
    })
}

/// Fails unless the value equals the top-level attribute `field` of the
/// whole data.
///
/// Two missing attributes are equal.
pub fn same_as(field: impl Into<String>) -> BoxedRule {
    let field = field.into();

    rule_fn(move |value, whole, _| {
        let same = match (value, whole.get(&field)) {
            (None, None) => true,
            (Some(a), Some(b)) => values_equal(a, b),
            _ => false,
        };
        (!same).then(|| format!("Must match {}", field).into())
    })
}
