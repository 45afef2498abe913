//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CloneEngine)
//! but are themselves concrete structs, not traits.

mod clone;

pub use clone::{CloneService, DestinationGuard};
