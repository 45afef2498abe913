//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    /// Rejected command line; `usage` is printed after the message.
    #[error("{message}")]
    Usage { message: String, usage: String },

    #[error("'{0}' is not a git2 command. See 'git2 --help'.")]
    UnknownCommand(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    pub fn usage(message: impl Into<String>, usage: impl Into<String>) -> Self {
        CliError::Usage {
            message: message.into(),
            usage: usage.into(),
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage { .. } => crate::exitcode::USAGE,
            CliError::UnknownCommand(_) => crate::exitcode::UNKNOWN_COMMAND,
            CliError::Infra(InfraError::Application(e)) => match e.primary() {
                ApplicationError::Cancelled => crate::exitcode::INTERRUPTED,
                ApplicationError::Domain(_) => crate::exitcode::USAGE,
                _ => crate::exitcode::FATAL,
            },
            CliError::Infra(_) => crate::exitcode::FATAL,
        }
    }

    /// Secondary failure to report after the error itself.
    pub fn cleanup_warning(&self) -> Option<String> {
        match self {
            CliError::Infra(InfraError::Application(ApplicationError::CleanupFailed {
                path,
                source,
                ..
            })) => Some(format!("could not remove '{}': {}", path.display(), source)),
            _ => None,
        }
    }
}
