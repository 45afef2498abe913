//! Command dispatch
//!
//! Parses the options that precede the command name, then hands the command
//! name and everything after it, unconsumed, to the command's handler. The
//! handler parses its own options from that slice.

use tracing::debug;

use crate::cli::args::{global_options, GlobalOptions};
use crate::cli::{CliError, CliResult, PROGRAM_NAME};
use crate::domain::{usage_text, OptKind, OptParser};
use crate::infrastructure::di::ServiceContainer;

/// A command handler. `args[0]` is the command name.
pub type Handler = fn(&ServiceContainer, &[String]) -> CliResult<()>;

/// A registered command.
pub struct CommandSpec {
    pub name: &'static str,
    pub handler: Handler,
    pub summary: &'static str,
}

pub fn find_command<'r>(registry: &'r [CommandSpec], name: &str) -> Option<&'r CommandSpec> {
    registry.iter().find(|c| c.name == name)
}

/// What the global parse decided to do.
pub enum Dispatch<'r, 'a> {
    Version,
    /// No command given (or `--help`): run the default help handler.
    Help,
    Command(&'r CommandSpec, &'a [String]),
}

/// Parse global options and resolve the command, without running it.
pub fn resolve<'r, 'a>(registry: &'r [CommandSpec], args: &'a [String]) -> CliResult<Dispatch<'r, 'a>> {
    let specs = global_options();
    let mut global = GlobalOptions::default();
    let mut command_args: &'a [String] = &[];

    {
        let mut parser = OptParser::new(&specs, args, &mut global);
        loop {
            let start = parser.index();
            match parser.next() {
                None => break,
                Some(Err(e)) => {
                    return Err(CliError::usage(
                        e.to_string(),
                        usage_text(PROGRAM_NAME, None, &specs),
                    ))
                }
                Some(Ok(m)) => {
                    if matches!(m.spec.kind, OptKind::Arg { .. }) {
                        command_args = &args[start..];
                        break;
                    }
                }
            }
        }
    }

    if global.show_version {
        return Ok(Dispatch::Version);
    }
    if global.show_help {
        return Ok(Dispatch::Help);
    }

    match global.command {
        Some(name) => match find_command(registry, &name) {
            Some(cmd) => {
                debug!("resolve: command={}, args={:?}", cmd.name, &command_args[1..]);
                Ok(Dispatch::Command(cmd, command_args))
            }
            None => Err(CliError::UnknownCommand(name)),
        },
        None => Ok(Dispatch::Help),
    }
}

/// Run the command selected by `args` (the process arguments minus the
/// program name).
pub fn dispatch(
    ctx: &ServiceContainer,
    registry: &[CommandSpec],
    default_handler: Handler,
    args: &[String],
) -> CliResult<()> {
    match resolve(registry, args)? {
        Dispatch::Version => {
            println!("{} version {}", PROGRAM_NAME, env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Dispatch::Help => default_handler(ctx, &[]),
        Dispatch::Command(cmd, command_args) => (cmd.handler)(ctx, command_args),
    }
}
