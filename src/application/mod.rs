//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod cancel;
pub mod error;
pub mod error_ext;
pub mod reporter;
pub mod services;

pub use cancel::CancellationToken;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use reporter::TransferReporter;
