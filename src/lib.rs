//! git2: a command-line front-end for cloning repositories
//!
//! The option parser, usage formatter and progress renderer live in
//! [`domain`]; [`application`] holds the clone flow; [`infrastructure`]
//! talks to the filesystem and the git engine; [`cli`] wires it together.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
