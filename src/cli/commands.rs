//! Command handlers and the command registry

use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::application::{CancellationToken, TransferReporter};
use crate::cli::args::{clone_options, global_options, help_options, CloneOptions, HelpOptions};
use crate::cli::dispatch::{self, CommandSpec};
use crate::cli::{CliError, CliResult, PROGRAM_NAME};
use crate::config::Settings;
use crate::domain::{parse, print_usage, usage_text, validate_table, CloneRequest, ProgressRenderer};
use crate::infrastructure::di::ServiceContainer;

/// Commands known to the program, in the order `help` lists them.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "clone",
        handler: cmd_clone,
        summary: "Clone a repository into a new directory",
    },
    CommandSpec {
        name: "help",
        handler: cmd_help,
        summary: "Display help information about a command",
    },
];

/// Load settings, wire up services and run the command named in `args`.
pub fn run(args: &[String], cancel: CancellationToken) -> CliResult<()> {
    let settings = Settings::load()?;
    debug!("run: settings={:?}", settings);
    let ctx = ServiceContainer::new(settings, cancel);
    dispatch::dispatch(&ctx, COMMANDS, cmd_help, args)
}

/// Text printed by `help` without arguments.
pub fn general_help(registry: &[CommandSpec]) -> String {
    let mut text = usage_text(PROGRAM_NAME, None, &global_options());
    text.push_str("\nThese are the available commands:\n");

    let width = registry.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for cmd in registry {
        text.push_str(&format!("    {:<width$}  {}\n", cmd.name, cmd.summary));
    }

    text.push_str(&format!(
        "\nSee '{PROGRAM_NAME} help <command>' for more information on a specific command.\n"
    ));
    text
}

/// Usage text of a registered command.
pub fn command_usage(name: &str) -> Option<String> {
    match name {
        "clone" => Some(usage_text(PROGRAM_NAME, Some("clone"), &clone_options())),
        "help" => Some(usage_text(PROGRAM_NAME, Some("help"), &help_options())),
        _ => None,
    }
}

/// `help [<command>]`
pub fn cmd_help(_ctx: &ServiceContainer, args: &[String]) -> CliResult<()> {
    let specs = help_options();
    let mut opts = HelpOptions::default();
    parse(&specs, args.get(1..).unwrap_or_default(), &mut opts).map_err(|e| {
        CliError::usage(e.to_string(), usage_text(PROGRAM_NAME, Some("help"), &specs))
    })?;

    let text = match opts.command {
        None => general_help(COMMANDS),
        Some(name) => command_usage(&name).ok_or(CliError::UnknownCommand(name))?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes()).ok();
    stdout.flush().ok();
    Ok(())
}

/// `clone [options] [--] <repository> [<directory>]`
#[instrument(skip(ctx))]
pub fn cmd_clone(ctx: &ServiceContainer, args: &[String]) -> CliResult<()> {
    let specs = clone_options();
    debug_assert!(validate_table(&specs).is_ok());

    let mut opts = CloneOptions::default();
    let parsed = parse(&specs, args.get(1..).unwrap_or_default(), &mut opts);

    // `--help` wins over any other problem on the line
    if opts.show_help {
        print_usage(&mut io::stdout(), PROGRAM_NAME, Some("clone"), &specs);
        return Ok(());
    }
    let usage = || usage_text(PROGRAM_NAME, Some("clone"), &specs);
    parsed.map_err(|e| CliError::usage(e.to_string(), usage()))?;

    let request = clone_request(&opts)
        .ok_or_else(|| CliError::usage("argument 'repository' is missing", usage()))?;
    let quiet = opts.quiet || ctx.settings.quiet;
    debug!("cmd_clone: request={:?}, quiet={}", request, quiet);

    let service = ctx.clone_service();
    let destination = service.prepare_destination(&request)?;

    if !quiet {
        println!("Cloning into '{}'...", destination.path().display());
    }

    let mut reporter = if quiet {
        TransferReporter::quiet(ctx.cancel.clone())
    } else {
        TransferReporter::new(Some(ProgressRenderer::new(io::stdout())), ctx.cancel.clone())
    };

    let path = service.clone_into(destination, &request, &mut reporter)?;
    debug!("cmd_clone: cloned into {}", path.display());
    Ok(())
}

/// Map parsed `clone` options onto a request. `None` without a repository.
pub fn clone_request(opts: &CloneOptions) -> Option<CloneRequest> {
    let remote = opts.remote_path.as_deref()?;
    let mut request = CloneRequest::new(remote);
    request.local_path = opts.local_path.as_ref().map(PathBuf::from);
    request.bare = opts.bare;
    request.checkout = opts.checkout && !opts.bare;
    request.branch = opts.branch.clone();
    Some(request)
}
