//! Rule combinators.
//!
//! Every combinator takes rules, rule lists or nested schemas and returns a
//! new [`BoxedRule`], so combinators nest freely:
//! - `first_error`: rules run in order, the first failure wins
//! - `all_errors`: every rule runs, all results are reported by position
//! - `one_of_rules`: passes if any rule passes
//! - `when`: rules run only if a condition holds
//! - `each`: rules run against every element of an array
//! - `msg_for`: any failure is replaced with a fixed message
//!
//! Rules always run in series. A rule is awaited to completion before the
//! next one starts, so rules that depend on each other's side effects behave
//! deterministically.
//!
//! # Example
//!
//! ```rust
//! use rulebook::{each, msg_for, one_of_rules, rules, RuleSchema};
//!
//! let schema = RuleSchema::new()
//!     .field("id", one_of_rules([rules::is_integer(), rules::is_string()]))
//!     .field(
//!         "tags",
//!         each([rules::is_string(), rules::max_length(16)]),
//!     )
//!     .field(
//!         "address",
//!         msg_for(
//!             RuleSchema::new().field("city", rules::required()),
//!             "Enter a complete address",
//!         ),
//!     );
//! ```

use std::sync::Arc;

use futures::future::FutureExt;
use serde_json::Value;

use crate::engine::evaluate;
use crate::error::{Diagnostic, ValidatorError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::condition::Condition;
use super::traits::{BoxedRule, Rule, RuleFuture};
use super::Entry;

/// An ordered list of rules; a single rule is a list of one.
#[derive(Clone, Default)]
pub struct RuleList(Vec<BoxedRule>);

impl RuleList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<BoxedRule> {
        self.0
    }
}

impl From<BoxedRule> for RuleList {
    fn from(rule: BoxedRule) -> Self {
        RuleList(vec![rule])
    }
}

impl From<Vec<BoxedRule>> for RuleList {
    fn from(rules: Vec<BoxedRule>) -> Self {
        RuleList(rules)
    }
}

impl<const N: usize> From<[BoxedRule; N]> for RuleList {
    fn from(rules: [BoxedRule; N]) -> Self {
        RuleList(rules.into())
    }
}

/// Runs rules in order and stops at the first failure.
pub(crate) async fn run_first_error(
    rules: &[BoxedRule],
    value: Option<&Value>,
    whole: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Result<Option<Diagnostic>, ValidatorError> {
    for (position, rule) in rules.iter().enumerate() {
        let outcome = rule.check_with_context(value, whole, path, context).await?;
        if let Some(diagnostic) = Diagnostic::normalize(outcome) {
            tracing::trace!(
                path = %path,
                position,
                skipped = rules.len() - position - 1,
                "rule failed, skipping remaining rules"
            );
            return Ok(Some(diagnostic));
        }
    }
    Ok(None)
}

/// Runs every rule in order and returns their results by position.
pub(crate) async fn collect_all(
    rules: &[BoxedRule],
    value: Option<&Value>,
    whole: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Result<Vec<Option<Diagnostic>>, ValidatorError> {
    let mut results = Vec::with_capacity(rules.len());
    for rule in rules {
        let outcome = rule.check_with_context(value, whole, path, context).await?;
        results.push(Diagnostic::normalize(outcome));
    }
    Ok(results)
}

/// Runs a context-aware rule under a fresh detached context.
fn detached<'a, R: Rule>(
    rule: &'a R,
    value: Option<&'a Value>,
    whole: &'a Value,
    path: &'a JsonPath,
) -> RuleFuture<'a> {
    async move {
        let context = ValidationContext::default();
        rule.check_with_context(value, whole, path, &context).await
    }
    .boxed()
}

fn collect_list_refs(rules: &[BoxedRule], refs: &mut Vec<String>) {
    for rule in rules {
        rule.collect_refs(refs);
    }
}

struct FirstError {
    rules: Vec<BoxedRule>,
}

impl Rule for FirstError {
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        detached(self, value, whole, path)
    }

    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        run_first_error(&self.rules, value, whole, path, context).boxed()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        collect_list_refs(&self.rules, refs);
    }
}

/// Sequential AND: runs `rules` in order and returns the first error.
///
/// Each rule is awaited before the next starts; once a rule fails the
/// remaining rules are never invoked. Accepts a single rule or a list.
///
/// # Example
///
/// ```rust
/// use rulebook::{first_error, rules};
///
/// let username = first_error([rules::is_string(), rules::min_length(3)]);
/// ```
pub fn first_error(rules: impl Into<RuleList>) -> BoxedRule {
    Arc::new(FirstError {
        rules: rules.into().into_vec(),
    })
}

struct AllErrors {
    rules: Vec<BoxedRule>,
}

impl Rule for AllErrors {
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        detached(self, value, whole, path)
    }

    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        async move {
            let results = collect_all(&self.rules, value, whole, path, context).await?;
            Ok(Diagnostic::normalize(Some(Diagnostic::Items(results))))
        }
        .boxed()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        collect_list_refs(&self.rules, refs);
    }
}

/// Runs every rule in `rules`, in series, whatever their outcome.
///
/// Reports [`Diagnostic::Items`] with one slot per rule (`None` for the
/// rules that passed) when at least one rule failed.
pub fn all_errors(rules: impl Into<RuleList>) -> BoxedRule {
    Arc::new(AllErrors {
        rules: rules.into().into_vec(),
    })
}

struct OneOfRules {
    rules: Vec<BoxedRule>,
}

impl Rule for OneOfRules {
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        detached(self, value, whole, path)
    }

    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        async move {
            let results = collect_all(&self.rules, value, whole, path, context).await?;
            if results.iter().all(Option::is_some) {
                Ok(results.into_iter().flatten().next())
            } else {
                Ok(None)
            }
        }
        .boxed()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        collect_list_refs(&self.rules, refs);
    }
}

/// Logical OR: passes if at least one rule passes.
///
/// All rules run in series. When every rule fails, the first error in list
/// order is returned.
///
/// # Example
///
/// ```rust
/// use rulebook::{one_of_rules, rules};
///
/// let id = one_of_rules([rules::is_integer(), rules::is_string()]);
/// ```
pub fn one_of_rules(rules: impl Into<RuleList>) -> BoxedRule {
    Arc::new(OneOfRules {
        rules: rules.into().into_vec(),
    })
}

struct When {
    condition: Condition,
    rules: Entry,
}

impl Rule for When {
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        detached(self, value, whole, path)
    }

    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        async move {
            if !self.condition.resolve(value, whole, path).await? {
                tracing::trace!(path = %path, "condition is false, rules skipped");
                return Ok(None);
            }
            evaluate(&self.rules, value, whole, path, context).await
        }
        .boxed()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.rules.collect_refs(refs);
    }
}

/// Conditional execution: evaluates `rules` only if `condition` holds.
///
/// The condition is resolved first. When it is false the wrapped rules are
/// never invoked and the attribute passes. `rules` may be a rule, a list of
/// rules or a nested schema.
///
/// # Example
///
/// ```rust
/// use rulebook::{conditions, rules, when, RuleSchema};
///
/// let schema = RuleSchema::new()
///     .field("email", when(conditions::is_defined(), rules::is_email()))
///     .field("car", when(false, RuleSchema::new().field("make", rules::required())));
/// ```
pub fn when(condition: impl Into<Condition>, rules: impl Into<Entry>) -> BoxedRule {
    Arc::new(When {
        condition: condition.into(),
        rules: rules.into(),
    })
}

struct Each {
    rules: Entry,
}

impl Rule for Each {
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        detached(self, value, whole, path)
    }

    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        async move {
            let Some(Value::Array(items)) = value else {
                return Ok(Some(Diagnostic::message("Must be an array")));
            };

            let mut results = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let item_path = path.push_index(idx);
                let outcome = evaluate(&self.rules, Some(item), whole, &item_path, context).await?;
                results.push(Diagnostic::normalize(outcome));
            }
            Ok(Diagnostic::normalize(Some(Diagnostic::Items(results))))
        }
        .boxed()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.rules.collect_refs(refs);
    }
}

/// Applies `rules` to every element of an array, in order.
///
/// Each element is evaluated with the array's path extended by its index.
/// Passes when no element fails; otherwise reports [`Diagnostic::Items`]
/// aligned with the input, `None` marking passing elements. A value that is
/// not an array fails with `Must be an array`.
///
/// # Example
///
/// ```rust
/// use rulebook::{each, rules, RuleSchema};
///
/// let colors = each(RuleSchema::new().field("hex", rules::is_string()));
/// ```
pub fn each(rules: impl Into<Entry>) -> BoxedRule {
    Arc::new(Each {
        rules: rules.into(),
    })
}

struct MsgFor {
    rules: Entry,
    message: String,
}

impl Rule for MsgFor {
    fn check<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
    ) -> RuleFuture<'a> {
        detached(self, value, whole, path)
    }

    fn check_with_context<'a>(
        &'a self,
        value: Option<&'a Value>,
        whole: &'a Value,
        path: &'a JsonPath,
        context: &'a ValidationContext,
    ) -> RuleFuture<'a> {
        async move {
            let outcome = evaluate(&self.rules, value, whole, path, context).await?;
            Ok(Diagnostic::normalize(outcome).map(|_| Diagnostic::message(self.message.clone())))
        }
        .boxed()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.rules.collect_refs(refs);
    }
}

/// Replaces any failure of `rules` with `message`.
///
/// Useful to turn a structured failure of a nested schema into one flat
/// message.
pub fn msg_for(rules: impl Into<Entry>, message: impl Into<String>) -> BoxedRule {
    Arc::new(MsgFor {
        rules: rules.into(),
        message: message.into(),
    })
}
