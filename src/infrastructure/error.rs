//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Failures reported by the version-control engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("operation aborted")]
    Aborted,

    #[error("{message}")]
    Failed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("could not run engine: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("could not install interrupt handler: {message}")]
    Signal { message: String },
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
