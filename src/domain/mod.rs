//! Domain layer: option tables, parsing, usage and progress rendering
//!
//! This layer is independent of external concerns (no process, filesystem or
//! config access). Output goes to whatever `Write` the caller supplies.

pub mod entities;
pub mod error;
pub mod opt;
pub mod parser;
pub mod progress;
pub mod usage;

pub use entities::*;
pub use error::DomainError;
pub use opt::{validate_table, OptFlags, OptKind, OptionSpec};
pub use parser::{parse, Matched, OptParser};
pub use progress::{percent, scale_units, Phase, ProgressRenderer, ProgressState, TransferStats};
pub use usage::{option_listing, print_usage, synopsis, usage_text};
