//! Resolution of named entries.
//!
//! [`Entry::Ref`](super::Entry::Ref) names an entry stored in a
//! [`RuleRegistry`](crate::RuleRegistry). References enable reuse and
//! recursive structures; they are resolved lazily, each time the engine
//! reaches one.

use std::sync::Arc;

use crate::error::ValidatorError;
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::Entry;

/// Looks up a referenced entry through the context's registry.
///
/// Fails when no registry is attached, when the name is unknown, or when the
/// reference chain is already `max_depth` links long.
pub(crate) fn resolve(
    name: &str,
    path: &JsonPath,
    context: &ValidationContext,
) -> Result<Arc<Entry>, ValidatorError> {
    if context.depth() >= context.max_depth() {
        tracing::warn!(reference = name, path = %path, "maximum reference depth exceeded");
        return Err(ValidatorError::MaxDepthExceeded {
            max_depth: context.max_depth(),
            path: path.clone(),
        });
    }

    let registry = context.registry().ok_or_else(|| {
        tracing::warn!(reference = name, path = %path, "reference evaluated without a registry");
        ValidatorError::MissingRegistry {
            name: name.to_string(),
            path: path.clone(),
        }
    })?;

    registry.get_entry(name).ok_or_else(|| {
        tracing::warn!(reference = name, path = %path, "reference is not registered");
        ValidatorError::UnknownReference {
            name: name.to_string(),
            path: path.clone(),
        }
    })
}
