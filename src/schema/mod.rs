//! Rule schemas and their building blocks.
//!
//! A [`RuleSchema`] maps attribute names to an [`Entry`]: a single rule, an
//! ordered list of rules, a nested schema, or a reference to a named entry in
//! a [`RuleRegistry`](crate::RuleRegistry).
//!
//! # Example
//!
//! ```rust
//! use rulebook::{rules, RuleSchema};
//!
//! let schema = RuleSchema::new()
//!     .field("deal", rules::is_string())
//!     .field(
//!         "car",
//!         RuleSchema::new()
//!             .field("make", rules::one_of_array(["BMW", "Audi"]))
//!             .field(
//!                 "engine",
//!                 RuleSchema::new().field("cylinders", [rules::required(), rules::is_integer()]),
//!             ),
//!     );
//!
//! assert_eq!(schema.len(), 2);
//! ```

mod combinators;
mod condition;
mod reference;
mod traits;

use std::fmt;

use indexmap::IndexMap;

pub use combinators::{all_errors, each, first_error, msg_for, one_of_rules, when, RuleList};
pub use condition::{conditions, Condition};
pub(crate) use combinators::run_first_error;
pub(crate) use reference::resolve;
pub use traits::{async_rule, rule_fn, BoxedRule, Rule, RuleFuture, RuleOutcome};

/// What a schema key maps to.
///
/// The engine dispatches on this tag; it never inspects rules to guess their
/// shape.
#[derive(Clone)]
pub enum Entry {
    /// A single rule.
    Rule(BoxedRule),
    /// Rules applied in order until the first failure.
    Rules(Vec<BoxedRule>),
    /// A nested schema; the attribute must be an object.
    Schema(RuleSchema),
    /// A named entry resolved through the registry at validation time.
    Ref(String),
}

impl Entry {
    /// Creates a reference to a named registry entry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rulebook::{rules, Entry, RuleRegistry, RuleSchema};
    ///
    /// let registry = RuleRegistry::new();
    /// registry
    ///     .register(
    ///         "Node",
    ///         RuleSchema::new()
    ///             .field("value", rules::is_integer())
    ///             .field("children", rulebook::each(Entry::reference("Node"))),
    ///     )
    ///     .unwrap();
    ///
    /// assert!(registry.unresolved_refs().is_empty());
    /// ```
    pub fn reference(name: impl Into<String>) -> Self {
        Entry::Ref(name.into())
    }

    /// Collects the names of all references reachable from this entry.
    pub fn collect_refs(&self, refs: &mut Vec<String>) {
        match self {
            Entry::Rule(rule) => rule.collect_refs(refs),
            Entry::Rules(rules) => {
                for rule in rules {
                    rule.collect_refs(refs);
                }
            }
            Entry::Schema(schema) => schema.collect_refs(refs),
            Entry::Ref(name) => refs.push(name.clone()),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Rule(_) => write!(f, "Rule"),
            Entry::Rules(rules) => write!(f, "Rules({})", rules.len()),
            Entry::Schema(schema) => fmt::Debug::fmt(schema, f),
            Entry::Ref(name) => write!(f, "Ref({:?})", name),
        }
    }
}

impl From<BoxedRule> for Entry {
    fn from(rule: BoxedRule) -> Self {
        Entry::Rule(rule)
    }
}

impl From<Vec<BoxedRule>> for Entry {
    fn from(rules: Vec<BoxedRule>) -> Self {
        Entry::Rules(rules)
    }
}

impl<const N: usize> From<[BoxedRule; N]> for Entry {
    fn from(rules: [BoxedRule; N]) -> Self {
        Entry::Rules(rules.into())
    }
}

impl From<RuleList> for Entry {
    fn from(rules: RuleList) -> Self {
        Entry::Rules(rules.into_vec())
    }
}

impl From<RuleSchema> for Entry {
    fn from(schema: RuleSchema) -> Self {
        Entry::Schema(schema)
    }
}

/// An ordered mapping from attribute name to [`Entry`].
///
/// Keys are validated in insertion order. A schema is immutable once built
/// and can be shared by any number of validators.
#[derive(Clone, Default)]
pub struct RuleSchema {
    fields: IndexMap<String, Entry>,
}

impl RuleSchema {
    /// Creates a schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the entry for an attribute.
    pub fn field(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.fields.insert(name.into(), entry.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in validation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Collects the names of all references reachable from this schema.
    pub fn collect_refs(&self, refs: &mut Vec<String>) {
        for entry in self.fields.values() {
            entry.collect_refs(refs);
        }
    }
}

impl fmt::Debug for RuleSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}
