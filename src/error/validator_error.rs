//! Failures that abort a validation call.
//!
//! Invalid data never shows up here; it is reported through the
//! [`ErrorTree`](crate::ErrorTree). These errors cover broken configuration
//! and rules that fail to run.

use crate::path::JsonPath;
use crate::registry::RegistryError;

/// An error that aborts a whole validation call.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// A schema entry references a named entry but no registry is attached.
    #[error("reference to '{name}' at '{path}' cannot be resolved without a registry")]
    MissingRegistry { name: String, path: JsonPath },

    /// A schema entry references a name the registry does not know.
    #[error("reference to '{name}' at '{path}' is not registered")]
    UnknownReference { name: String, path: JsonPath },

    /// Following references went deeper than the configured limit.
    #[error("maximum reference depth {max_depth} exceeded at '{path}'")]
    MaxDepthExceeded { max_depth: usize, path: JsonPath },

    /// A rule could not complete its check.
    #[error("rule failed at '{path}': {message}")]
    RuleFailed { path: JsonPath, message: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ValidatorError {
    /// Creates a rule-execution failure for the rule running at `path`.
    pub fn rule_failed(path: &JsonPath, message: impl Into<String>) -> Self {
        ValidatorError::RuleFailed {
            path: path.clone(),
            message: message.into(),
        }
    }
}
