//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors: malformed option tables and rejected command lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("argument '{0}' requires a value")]
    MissingValue(String),

    #[error("argument '{0}' is missing")]
    MissingArgument(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("option table declares more than one literal separator")]
    DuplicateLiteral,

    #[error("option table row '{0}' follows the variadic argument")]
    RowAfterVarArgs(String),
}

impl DomainError {
    /// The command-line token (or argument name) the failure refers to.
    pub fn offending_token(&self) -> Option<&str> {
        match self {
            DomainError::UnknownOption(t)
            | DomainError::MissingValue(t)
            | DomainError::MissingArgument(t)
            | DomainError::UnexpectedArgument(t)
            | DomainError::RowAfterVarArgs(t) => Some(t),
            DomainError::DuplicateLiteral => None,
        }
    }
}
