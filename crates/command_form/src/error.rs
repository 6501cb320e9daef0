//! Form-construction failures. These abort the affected command's form before any of it is
//! shown; nothing here terminates the process.

use thiserror::Error;

/// Rejection raised while turning a command's parameter list into widgets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormBuildError {
    /// The parameter's kind has no registered widget factory and is not custom.
    #[error("parameter `{parameter}` has kind `{kind}` with no registered widget factory")]
    UnsupportedType {
        /// Offending parameter name.
        parameter: String,
        /// Display name of the unhandled kind.
        kind: String,
    },
    /// The specification is malformed in a way the type system cannot rule out.
    #[error("parameter `{parameter}` is malformed: {reason}")]
    InvalidSpec {
        /// Offending parameter name.
        parameter: String,
        /// What is wrong with it.
        reason: String,
    },
}
