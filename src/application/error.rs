//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::EngineError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("destination path '{}' already exists and is not an empty directory.", .0.display())]
    DestinationNotEmpty(PathBuf),

    #[error("could not clone: {0}")]
    Engine(#[from] EngineError),

    #[error("interrupted")]
    Cancelled,

    /// `cause` ended the clone and removing the partial destination failed too.
    #[error("{cause}")]
    CleanupFailed {
        cause: Box<ApplicationError>,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("{context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// The error that ended the operation, looking through cleanup failures.
    pub fn primary(&self) -> &ApplicationError {
        match self {
            ApplicationError::CleanupFailed { cause, .. } => cause.primary(),
            other => other,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
