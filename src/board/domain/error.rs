//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// An identifier was zero; remote identifiers are positive integers.
    #[error("invalid {kind} identifier {value}, expected a positive integer")]
    InvalidIdentifier {
        /// Identifier kind, such as `task` or `project`.
        kind: &'static str,
        /// Rejected raw value.
        value: u64,
    },

    /// A task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}
