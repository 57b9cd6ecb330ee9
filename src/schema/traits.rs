//! The rule contract.
//!
//! This module provides the [`Rule`] trait every check implements, along with
//! [`rule_fn`] and [`async_rule`] for building rules out of closures.

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::error::{Diagnostic, ValidatorError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

/// Result of running one rule.
///
/// `Ok(None)` means the value passed, `Ok(Some(_))` carries the diagnostic of
/// a failed check and `Err(_)` aborts the whole validation call.
pub type RuleOutcome = Result<Option<Diagnostic>, ValidatorError>;

/// The future returned by [`Rule::check`].
pub type RuleFuture<'a> = BoxFuture<'a, RuleOutcome>;

/// A shared, type-erased rule.
pub type BoxedRule = Arc<dyn Rule>;

/// A check applied to one attribute.
///
/// Rules receive the attribute value (`None` when the attribute is missing),
/// the whole data object passed to the validator, and the path of the
/// attribute. Every rule is awaited by the engine before the next one starts,
/// whether or not it actually suspends.
///
/// The `Send + Sync` bounds allow validators to be shared across tasks and
/// threads.
///
/// # Example
///
/// ```rust
/// use futures::FutureExt;
/// use rulebook::{Diagnostic, JsonPath, Rule, RuleFuture};
/// use serde_json::Value;
///
/// struct NotBlank;
///
/// impl Rule for NotBlank {
///     fn check<'a>(
///         &'a self,
///         value: Option<&'a Value>,
///         _whole: &'a Value,
///         _path: &'a JsonPath,
///     ) -> RuleFuture<'a> {
///         let blank = value
///             .and_then(Value::as_str)
///             .map_or(false, |s| s.trim().is_empty());
///         async move { Ok(blank.then(|| Diagnostic::from("Must not be blank"))) }.boxed()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Checks a value, resolving to the rule's outcome.
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a>;

    /// Checks a value with access to the validation context.
    ///
    /// The engine always calls this method. Rules that wrap other entries
    /// override it so references inside them resolve through the caller's
    /// registry.
    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        _context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        self.check(value, whole, path)
    }

    /// Collects the names of all entries this rule references.
    fn collect_refs(&self, _refs: &mut Vec<String>) {}
}

struct FnRule<F>(F);

impl<F> Rule for FnRule<F>
where
    F: Fn(Option<&Value>, &Value, &JsonPath) -> Option<Diagnostic> + Send + Sync,
{
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        future::ready(Ok((self.0)(value, whole, path))).boxed()
    }
}

struct AsyncFnRule<F>(F);

impl<F> Rule for AsyncFnRule<F>
where
    F: for<'a> Fn(Option<&'a Value>, &'a Value, &'a JsonPath) -> RuleFuture<'a> + Send + Sync,
{
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        (self.0)(value, whole, path)
    }
}

/// Builds a rule from a synchronous closure.
///
/// # Example
///
/// ```rust
/// use rulebook::{rule_fn, Diagnostic};
///
/// let even = rule_fn(|value, _whole, _path| match value.and_then(|v| v.as_i64()) {
///     Some(n) if n % 2 == 0 => None,
///     _ => Some(Diagnostic::from("Must be even")),
/// });
/// ```
pub fn rule_fn<F>(f: F) -> BoxedRule
where
    F: Fn(Option<&Value>, &Value, &JsonPath) -> Option<Diagnostic> + Send + Sync + 'static,
{
    Arc::new(FnRule(f))
}

/// Builds a rule from a closure returning a boxed future.
///
/// Use this for checks that wait on I/O or may fail to run at all.
///
/// # Example
///
/// ```rust
/// use futures::FutureExt;
/// use rulebook::{async_rule, Diagnostic};
///
/// let taken = async_rule(|value, _whole, _path| {
///     async move {
///         let name = value.and_then(|v| v.as_str()).unwrap_or_default();
///         Ok((name == "admin").then(|| Diagnostic::from("Username is taken")))
///     }
///     .boxed()
/// });
/// ```
pub fn async_rule<F>(f: F) -> BoxedRule
where
    F: for<'a> Fn(Option<&'a Value>, &'a Value, &'a JsonPath) -> RuleFuture<'a>
        + Send
        + Sync
        + 'static,
{
    Arc::new(AsyncFnRule(f))
}
