//! Option tables for the program and its commands
//!
//! Each command owns an options struct and a table describing how the
//! command line fills it in.

use crate::domain::OptionSpec;

/// Options that precede the command name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    pub show_version: bool,
    pub show_help: bool,
    pub command: Option<String>,
    pub args: Vec<String>,
}

pub fn global_options() -> Vec<OptionSpec<GlobalOptions>> {
    type Spec = OptionSpec<GlobalOptions>;

    vec![
        Spec::switch("help", Some('h'), |o| &mut o.show_help, true).hidden(),
        Spec::switch("version", None, |o| &mut o.show_version, true).help("display the version"),
        Spec::arg("command", |o| &mut o.command)
            .help("the command to run")
            .required(),
        Spec::var_args("args", |o| &mut o.args).help("arguments for the command"),
    ]
}

/// Options of `clone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    pub show_help: bool,
    pub quiet: bool,
    pub checkout: bool,
    pub bare: bool,
    pub branch: Option<String>,
    pub remote_path: Option<String>,
    pub local_path: Option<String>,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            show_help: false,
            quiet: false,
            checkout: true,
            bare: false,
            branch: None,
            remote_path: None,
            local_path: None,
        }
    }
}

pub fn clone_options() -> Vec<OptionSpec<CloneOptions>> {
    type Spec = OptionSpec<CloneOptions>;

    vec![
        Spec::switch("help", Some('h'), |o| &mut o.show_help, true).hidden(),
        Spec::switch("quiet", Some('q'), |o| &mut o.quiet, true).help("quiet"),
        Spec::switch("no-checkout", Some('n'), |o| &mut o.checkout, false)
            .help("don't checkout HEAD"),
        Spec::switch("bare", None, |o| &mut o.bare, true).help("don't create a working directory"),
        Spec::value("branch", Some('b'), |o| &mut o.branch, "name").help("branch to check out"),
        Spec::literal(),
        Spec::arg("repository", |o| &mut o.remote_path)
            .help("repository path")
            .required(),
        Spec::arg("directory", |o| &mut o.local_path).help("directory to clone into"),
    ]
}

/// Options of `help`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HelpOptions {
    pub command: Option<String>,
}

pub fn help_options() -> Vec<OptionSpec<HelpOptions>> {
    type Spec = OptionSpec<HelpOptions>;

    vec![Spec::arg("command", |o| &mut o.command).help("the command to show help for")]
}
