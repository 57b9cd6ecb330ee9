//! Error types.
//!
//! [`Diagnostic`] and [`ErrorTree`] describe invalid data; they are the
//! normal outcome of a failed validation. [`ValidatorError`] describes
//! failures that abort the validation call itself.

mod diagnostic;
mod validator_error;

pub use diagnostic::{Diagnostic, ErrorTree, FieldError};
pub use validator_error::ValidatorError;
