//! # Rulebook
//!
//! Declarative, schema-driven validation of JSON data.
//!
//! ## Overview
//!
//! A schema mirrors the shape of the data it checks. Each key maps to a rule,
//! a list of rules, a nested schema, or a reference to a registered entry.
//! Validating data produces either success or an [`ErrorTree`] that mirrors
//! the schema and holds only the failing branches.
//!
//! Rules are asynchronous and run strictly in series, in schema order. Every
//! rule receives the value at its location, the whole data object and its
//! [`JsonPath`], so cross-field checks need no special support.
//!
//! ## Core Types
//!
//! - [`RuleSchema`]: An ordered map from attribute names to [`Entry`] values
//! - [`Rule`]: The trait every check implements; build one with [`rule_fn`] or [`async_rule`]
//! - [`Validator`]: A reusable validator closed over a schema
//! - [`ErrorTree`] and [`Diagnostic`]: The shape of validation failures
//! - [`RuleRegistry`]: Named entries for reuse and recursive schemas
//!
//! ## Example
//!
//! ```rust
//! use rulebook::{create_validator, each, rules, when, conditions, RuleSchema};
//! use serde_json::json;
//!
//! let validator = create_validator(
//!     RuleSchema::new()
//!         .field("deal", rules::is_string())
//!         .field(
//!             "car",
//!             RuleSchema::new()
//!                 .field("make", rules::one_of_array(["BMW", "Mercedes", "Audi"]))
//!                 .field("colors", each(rules::is_string()))
//!                 .field("mileage", when(conditions::is_defined(), rules::is_integer())),
//!         ),
//! );
//!
//! # futures::executor::block_on(async {
//! let result = validator
//!     .validate(&json!({
//!         "deal": "purchase",
//!         "car": { "make": "BMW", "colors": ["black", "white"] }
//!     }))
//!     .await
//!     .unwrap();
//! assert!(result.is_success());
//!
//! let errors = validator
//!     .validate(&json!({ "car": { "make": "Lada", "colors": ["red", 5] } }))
//!     .await
//!     .unwrap()
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(errors.get("deal").unwrap().as_message(), Some("Must be string"));
//! assert_eq!(
//!     errors.at(&["car", "colors", "1"]).unwrap().as_message(),
//!     Some("Must be string")
//! );
//! # });
//! ```

pub mod error;
pub mod path;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod validation;

mod engine;

pub use engine::{create_validator, validate, Validator};
pub use error::{Diagnostic, ErrorTree, FieldError, ValidatorError};
pub use path::{JsonPath, PathSegment};
pub use registry::{RegistryError, RuleRegistry};
pub use schema::{
    all_errors, async_rule, conditions, each, first_error, msg_for, one_of_rules, rule_fn, when,
    BoxedRule, Condition, Entry, Rule, RuleFuture, RuleList, RuleOutcome, RuleSchema,
};
pub use validation::{RegistryAccess, ValidationContext};

/// Outcome of a validation run: success, or the tree of failures.
pub type ValidationResult = stillwater::Validation<(), ErrorTree>;
