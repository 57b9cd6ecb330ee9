//! The validator engine.
//!
//! [`Validator`] walks a [`RuleSchema`] against a data object, one key at a
//! time, and assembles an [`ErrorTree`] holding only the failing branches.
//! Nested schemas, rule lists and the combinators all meet in [`evaluate`],
//! the single dispatch point on [`Entry`].

use std::sync::Arc;

use futures::future::FutureExt;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{Diagnostic, ErrorTree, ValidatorError};
use crate::path::JsonPath;
use crate::registry::RuleRegistry;
use crate::schema::{self, Entry, RuleFuture, RuleSchema};
use crate::validation::{ValidationContext, DEFAULT_MAX_DEPTH};
use crate::ValidationResult;

/// Evaluates any entry against one value.
///
/// - rules and rule lists run with first-error semantics;
/// - nested schemas require an object value and recurse;
/// - references resolve through the context registry, one level deeper.
pub(crate) fn evaluate<'a>(
    entry: &'a Entry,
    value: Option<&'a Value>,
    whole: &'a Value,
    path: &'a JsonPath,
    context: &'a ValidationContext,
) -> RuleFuture<'a> {
    async move {
        match entry {
            Entry::Rule(rule) => {
                let outcome = rule.check_with_context(value, whole, path, context).await?;
                Ok(Diagnostic::normalize(outcome))
            }
            Entry::Rules(rules) => {
                schema::run_first_error(rules, value, whole, path, context).await
            }
            Entry::Schema(nested) => match value {
                Some(data @ Value::Object(_)) => {
                    let tree = validate_object(nested, data, whole, path, context).await?;
                    Ok(tree.into_diagnostic())
                }
                _ => Ok(Some(Diagnostic::message(format!(
                    "Property {} must be an object",
                    path.dotted()
                )))),
            },
            Entry::Ref(name) => {
                let resolved = schema::resolve(name, path, context)?;
                let deeper = context.increment_depth();
                evaluate(&resolved, value, whole, path, &deeper).await
            }
        }
    }
    .boxed()
}

/// Validates every key of `schema` against `data`, strictly in series.
pub(crate) async fn validate_object(
    schema: &RuleSchema,
    data: &Value,
    whole: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Result<ErrorTree, ValidatorError> {
    let mut errors = ErrorTree::new();
    for (key, entry) in schema.iter() {
        let key_path = path.push_field(key);
        let outcome = evaluate(entry, data.get(key), whole, &key_path, context).await?;
        if let Some(diagnostic) = outcome {
            tracing::trace!(path = %key_path, "attribute failed validation");
            errors.insert(key, diagnostic);
        }
    }
    Ok(errors)
}

/// Runs a schema at the root, where the whole data is the data itself.
async fn run(
    schema: &RuleSchema,
    data: &Value,
    context: &ValidationContext,
) -> Result<ValidationResult, ValidatorError> {
    tracing::debug!(keys = schema.len(), "validating");
    let errors = validate_object(schema, data, data, &JsonPath::root(), context).await?;

    if errors.is_empty() {
        tracing::debug!("validation passed");
        Ok(Validation::Success(()))
    } else {
        tracing::debug!(failed_keys = errors.len(), "validation failed");
        Ok(Validation::Failure(errors))
    }
}

/// A reusable validator closed over a schema.
///
/// Validators are cheap to clone and can be shared between tasks; every call
/// builds its own error tree.
///
/// # Example
///
/// ```rust
/// use rulebook::{create_validator, rules, RuleSchema};
/// use serde_json::json;
///
/// # futures::executor::block_on(async {
/// let validator = create_validator(
///     RuleSchema::new()
///         .field("deal", rules::is_string())
///         .field("car", RuleSchema::new().field("make", rules::one_of_array(["BMW"]))),
/// );
///
/// let result = validator
///     .validate(&json!({ "deal": "purchase", "car": { "make": "BMW" } }))
///     .await
///     .unwrap();
/// assert!(result.is_success());
///
/// let errors = validator
///     .validate(&json!({ "car": { "make": "Lada" } }))
///     .await
///     .unwrap()
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.len(), 2);
/// # });
/// ```
#[derive(Clone)]
pub struct Validator {
    schema: Arc<RuleSchema>,
    registry: Option<RuleRegistry>,
    max_depth: Option<usize>,
}

impl Validator {
    /// Creates a validator for `schema` with no registry attached.
    pub fn new(schema: RuleSchema) -> Self {
        Self {
            schema: Arc::new(schema),
            registry: None,
            max_depth: None,
        }
    }

    /// Resolves references in the schema through `registry`.
    ///
    /// Unless [`with_max_depth`](Self::with_max_depth) was called, the
    /// registry's depth limit applies.
    pub fn with_registry(mut self, registry: &RuleRegistry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    /// Sets the maximum length of a reference chain.
    ///
    /// Takes precedence over the attached registry's limit, whichever is
    /// configured first.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Returns the reference depth limit this validator runs with.
    pub fn max_depth(&self) -> usize {
        match (self.max_depth, &self.registry) {
            (Some(depth), _) => depth,
            (None, Some(registry)) => registry.max_depth(),
            (None, None) => DEFAULT_MAX_DEPTH,
        }
    }

    /// Returns the schema this validator checks.
    pub fn schema(&self) -> &RuleSchema {
        &self.schema
    }

    /// Validates `data`.
    ///
    /// Resolves to `Success(())` when every rule passed, or `Failure` with a
    /// non-empty [`ErrorTree`]. Configuration failures and rules that fail to
    /// run abort the call with a [`ValidatorError`].
    pub async fn validate(&self, data: &Value) -> Result<ValidationResult, ValidatorError> {
        let context = match &self.registry {
            Some(registry) => ValidationContext::new(Arc::new(registry.clone()), self.max_depth()),
            None => ValidationContext::detached(self.max_depth()),
        };
        run(&self.schema, data, &context).await
    }
}

/// Builds a reusable validator closed over `schema`.
pub fn create_validator(schema: RuleSchema) -> Validator {
    Validator::new(schema)
}

/// Validates `data` against `schema` once.
///
/// Equivalent to `create_validator(schema).validate(data)` without taking
/// ownership of the schema.
///
/// # Example
///
/// ```rust
/// use rulebook::{rules, validate, RuleSchema};
/// use serde_json::json;
///
/// # futures::executor::block_on(async {
/// let schema = RuleSchema::new().field("age", [rules::is_integer(), rules::min_value(18.0)]);
///
/// let errors = validate(&schema, &json!({ "age": 16 }))
///     .await
///     .unwrap()
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.get("age").unwrap().as_message(), Some("Must be at least 18"));
/// # });
/// ```
pub async fn validate(schema: &RuleSchema, data: &Value) -> Result<ValidationResult, ValidatorError> {
    run(schema, data, &ValidationContext::default()).await
}
