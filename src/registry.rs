//! Named entries and reference resolution.
//!
//! This module provides the [`RuleRegistry`] type that stores named rules and
//! schemas so that schemas can refer to them with
//! [`Entry::reference`](crate::Entry::reference).

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::engine::Validator;
use crate::error::ValidatorError;
use crate::schema::Entry;
use crate::validation::{RegistryAccess, DEFAULT_MAX_DEPTH};
use crate::ValidationResult;

/// Type alias for the entry storage map.
type EntryMap = Arc<RwLock<HashMap<String, Arc<Entry>>>>;

/// A thread-safe registry of named rules and schemas.
///
/// The registry enables reuse and recursive schemas. Entries are registered
/// under a name and referenced from other schemas; references resolve each
/// time the engine reaches them, so registration order does not matter.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple validations can run concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use rulebook::{rules, Entry, RuleRegistry, RuleSchema};
/// use serde_json::json;
///
/// let registry = RuleRegistry::new();
/// registry
///     .register("Engine", RuleSchema::new().field("cylinders", rules::is_integer()))
///     .unwrap();
/// registry
///     .register("Car", RuleSchema::new().field("engine", Entry::reference("Engine")))
///     .unwrap();
///
/// # futures::executor::block_on(async {
/// let result = registry
///     .validate("Car", &json!({ "engine": { "cylinders": 6 } }))
///     .await
///     .unwrap();
/// assert!(result.is_success());
/// # });
/// ```
pub struct RuleRegistry {
    entries: EntryMap,
    max_depth: usize,
}

impl RuleRegistry {
    /// Creates an empty registry with the default max depth of 100.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum reference depth.
    ///
    /// When a chain of references grows past this depth, validation aborts
    /// with [`ValidatorError::MaxDepthExceeded`].
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the maximum reference depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Registers an entry under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register(&self, name: impl Into<String>, entry: impl Into<Entry>) -> Result<(), RegistryError> {
        let name = name.into();
        let mut entries = self.entries.write();

        if entries.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(name = %name, "registered entry");
        entries.insert(name, Arc::new(entry.into()));
        Ok(())
    }

    /// Retrieves an entry by name.
    pub fn get(&self, name: &str) -> Option<Arc<Entry>> {
        self.entries.read().get(name).cloned()
    }

    /// Returns true if an entry is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Lists referenced names that have no registered entry.
    ///
    /// Call this after all entries are registered to catch typos before the
    /// first validation trips over them. Names are sorted and deduplicated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rulebook::{Entry, RuleRegistry, RuleSchema};
    ///
    /// let registry = RuleRegistry::new();
    /// registry
    ///     .register("Car", RuleSchema::new().field("engine", Entry::reference("Engine")))
    ///     .unwrap();
    ///
    /// assert_eq!(registry.unresolved_refs(), vec!["Engine"]);
    /// ```
    pub fn unresolved_refs(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut all_refs = Vec::new();

        for entry in entries.values() {
            entry.collect_refs(&mut all_refs);
        }

        let mut unresolved: Vec<_> = all_refs
            .into_iter()
            .filter(|name| !entries.contains_key(name))
            .collect();

        unresolved.sort();
        unresolved.dedup();
        unresolved
    }

    /// Builds a validator for the schema registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the name is not registered and
    /// `RegistryError::NotASchema` if it names a rule rather than a schema.
    pub fn validator(&self, name: &str) -> Result<Validator, RegistryError> {
        let entry = self
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        match entry.as_ref() {
            Entry::Schema(schema) => Ok(Validator::new(schema.clone()).with_registry(self)),
            _ => Err(RegistryError::NotASchema(name.to_string())),
        }
    }

    /// Validates `data` against the schema registered under `name`.
    pub async fn validate(&self, name: &str, data: &Value) -> Result<ValidationResult, ValidatorError> {
        self.validator(name)?.validate(data).await
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RuleRegistry {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            max_depth: self.max_depth,
        }
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut names: Vec<_> = entries.keys().collect();
        names.sort();
        f.debug_struct("RuleRegistry")
            .field("entries", &names)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl RegistryAccess for RuleRegistry {
    fn get_entry(&self, name: &str) -> Option<Arc<Entry>> {
        self.get(name)
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register an entry with a name that already exists.
    #[error("entry '{0}' already registered")]
    DuplicateName(String),

    /// Looked up a name that is not registered.
    #[error("entry '{0}' not found")]
    NotFound(String),

    /// Asked for a validator over an entry that is not a schema.
    #[error("entry '{0}' is not a schema")]
    NotASchema(String),
}
