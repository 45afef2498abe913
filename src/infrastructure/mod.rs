//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod git;
pub mod git_progress;
pub mod signal;
pub mod traits;

pub use error::{EngineError, InfraError, InfraResult};
