//! Validation context for reference resolution.
//!
//! This module provides the [`ValidationContext`] type that travels with every
//! evaluation. It carries the registry used to resolve named entries and the
//! depth of the current reference chain.

use std::sync::Arc;

use crate::schema::Entry;

/// Default bound on nested reference resolution.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Validation context carries registry and depth tracking information.
///
/// The context is passed through the evaluation call chain to enable:
/// - Reference resolution via registry lookup
/// - Depth tracking to stop runaway recursion through references
///
/// A context without a registry is "detached"; references evaluated under it
/// fail with [`ValidatorError::MissingRegistry`](crate::ValidatorError).
#[derive(Clone)]
pub struct ValidationContext {
    registry: Option<Arc<dyn RegistryAccess>>,
    depth: usize,
    max_depth: usize,
}

impl ValidationContext {
    /// Creates a new validation context with a registry and max depth limit.
    pub fn new(registry: Arc<dyn RegistryAccess>, max_depth: usize) -> Self {
        Self {
            registry: Some(registry),
            depth: 0,
            max_depth,
        }
    }

    /// Creates a context with no registry attached.
    pub fn detached(max_depth: usize) -> Self {
        Self {
            registry: None,
            depth: 0,
            max_depth,
        }
    }

    /// Creates a new context with incremented depth.
    ///
    /// Called when following a reference to track the length of the chain.
    pub fn increment_depth(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    /// Returns the current depth of reference traversal.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the maximum allowed depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the registry for entry lookups, if one is attached.
    pub fn registry(&self) -> Option<&dyn RegistryAccess> {
        self.registry.as_deref()
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::detached(DEFAULT_MAX_DEPTH)
    }
}

/// Trait for looking up named entries.
///
/// This trait abstracts registry access so the engine does not depend on the
/// registry module directly.
pub trait RegistryAccess: Send + Sync {
    /// Gets an entry by name from the registry.
    fn get_entry(&self, name: &str) -> Option<Arc<Entry>>;
}
