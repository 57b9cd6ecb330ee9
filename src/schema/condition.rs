//! Conditions gating [`when`](crate::when).

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::path::JsonPath;

type CheckFn = Arc<dyn Fn(Option<&Value>, &Value, &JsonPath) -> bool + Send + Sync>;

type AsyncCheckFn = Arc<
    dyn for<'a> Fn(
            Option<&'a Value>,
            &'a Value,
            &'a JsonPath,
        ) -> BoxFuture<'a, Result<bool, ValidatorError>>
        + Send
        + Sync,
>;

/// Decides whether the rules wrapped by [`when`](crate::when) run.
///
/// # Example
///
/// ```rust
/// use rulebook::{rules, when, Condition};
///
/// // Only check the VAT number for business customers.
/// let vat = when(
///     Condition::check(|_value, whole, _path| whole["kind"] == "business"),
///     [rules::required(), rules::is_string()],
/// );
/// ```
#[derive(Clone)]
pub enum Condition {
    /// A fixed decision.
    Static(bool),
    /// A decision that becomes available later; awaited on every evaluation.
    Pending(Shared<BoxFuture<'static, bool>>),
    /// A synchronous predicate over `(value, whole, path)`.
    Check(CheckFn),
    /// An asynchronous predicate over `(value, whole, path)`; may fail.
    AsyncCheck(AsyncCheckFn),
}

impl Condition {
    /// Wraps a future resolving to the decision.
    ///
    /// The future runs at most once; later evaluations reuse its output.
    pub fn pending<F>(decision: F) -> Self
    where
        F: std::future::Future<Output = bool> + Send + 'static,
    {
        Condition::Pending(decision.boxed().shared())
    }

    /// Wraps a synchronous predicate.
    pub fn check<F>(predicate: F) -> Self
    where
        F: Fn(Option<&Value>, &Value, &JsonPath) -> bool + Send + Sync + 'static,
    {
        Condition::Check(Arc::new(predicate))
    }

    /// Wraps an asynchronous predicate.
    pub fn check_async<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(
                Option<&'a Value>,
                &'a Value,
                &'a JsonPath,
            ) -> BoxFuture<'a, Result<bool, ValidatorError>>
            + Send
            + Sync
            + 'static,
    {
        Condition::AsyncCheck(Arc::new(predicate))
    }

    /// Resolves the decision for one evaluation.
    pub async fn resolve(
        &self,
        value: Option<&Value>,
        whole: &Value,
        path: &JsonPath,
    ) -> Result<bool, ValidatorError> {
        match self {
            Condition::Static(decision) => Ok(*decision),
            Condition::Pending(decision) => Ok(decision.clone().await),
            Condition::Check(predicate) => Ok(predicate(value, whole, path)),
            Condition::AsyncCheck(predicate) => predicate(value, whole, path).await,
        }
    }
}

impl From<bool> for Condition {
    fn from(decision: bool) -> Self {
        Condition::Static(decision)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Static(decision) => write!(f, "Static({})", decision),
            Condition::Pending(_) => write!(f, "Pending"),
            Condition::Check(_) => write!(f, "Check"),
            Condition::AsyncCheck(_) => write!(f, "AsyncCheck"),
        }
    }
}

/// Ready-made conditions for optional attributes.
pub mod conditions {
    use super::Condition;

    /// True when the attribute is present (explicit `null` counts as present).
    pub fn is_defined() -> Condition {
        Condition::check(|value, _, _| value.is_some())
    }

    /// True when the attribute is present, not `null` and not an empty string.
    pub fn not_empty() -> Condition {
        Condition::check(|value, _, _| match value {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        })
    }
}
