//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print fatal error (red bold "fatal:" prefix) to stderr
pub fn fatal(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "fatal".red().bold(), msg);
}

/// Print warning (yellow "warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Print a message prefixed with the program name to stderr
pub fn program_error(program: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", program, msg);
}

/// Print usage text to stderr, after an error line
pub fn usage(text: &str) {
    eprint!("{}", text);
}
