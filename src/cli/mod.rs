//! CLI layer: option tables, command dispatch and handlers

pub mod args;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod output;

pub use commands::{run, COMMANDS};
pub use dispatch::{dispatch, CommandSpec, Handler};
pub use error::{CliError, CliResult};

/// Name the program reports in usage and version output.
pub const PROGRAM_NAME: &str = "git2";

/// Print `err` the way the command line reports failures.
pub fn report_error(err: &CliError) {
    match err {
        CliError::Usage { message, usage } => {
            output::error(message);
            output::usage(usage);
        }
        CliError::UnknownCommand(_) => output::program_error(PROGRAM_NAME, err),
        CliError::Infra(_) => {
            output::fatal(err);
            if let Some(warning) = err.cleanup_warning() {
                output::warning(&warning);
            }
        }
    }
}
