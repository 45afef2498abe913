//! Declarative option tables
//!
//! A command describes the options and positionals it accepts as a list of
//! [`OptionSpec`] rows. The rows hold no parsed state: each one carries an
//! accessor into the command's own options struct, which the parser writes
//! through while it scans the arguments.

use std::fmt;
use std::ops::BitOr;

use crate::domain::error::DomainError;

/// Per-row flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptFlags(u8);

impl OptFlags {
    pub const NONE: Self = Self(0);
    /// Omit the row from usage output.
    pub const HIDDEN: Self = Self(1);
    /// Parsing fails if the row never receives a value.
    pub const REQUIRED: Self = Self(1 << 1);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OptFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The variant of a row together with where its value is written.
pub enum OptKind<T> {
    /// Boolean flag; writes `value` into the target when present.
    Switch {
        target: fn(&mut T) -> &mut bool,
        value: bool,
    },
    /// Flag taking exactly one value (`--branch <name>`).
    Value {
        target: fn(&mut T) -> &mut Option<String>,
    },
    /// Single positional argument.
    Arg {
        target: fn(&mut T) -> &mut Option<String>,
    },
    /// All remaining positionals. Must be the last row.
    VarArgs {
        target: fn(&mut T) -> &mut Vec<String>,
    },
    /// The `--` separator.
    Literal,
}

/// One row of an option table.
pub struct OptionSpec<T> {
    pub kind: OptKind<T>,
    /// Matched as `--long_name`; for positionals this is the argument name.
    pub long_name: &'static str,
    /// Matched as `-c`.
    pub short_name: Option<char>,
    /// Placeholder shown in usage text.
    pub value_name: &'static str,
    /// One-line description; empty suppresses the row in the option listing.
    pub help_text: &'static str,
    pub flags: OptFlags,
}

impl<T> OptionSpec<T> {
    fn new(kind: OptKind<T>, long_name: &'static str, short_name: Option<char>) -> Self {
        Self {
            kind,
            long_name,
            short_name,
            value_name: "",
            help_text: "",
            flags: OptFlags::NONE,
        }
    }

    pub fn switch(
        long_name: &'static str,
        short_name: Option<char>,
        target: fn(&mut T) -> &mut bool,
        value: bool,
    ) -> Self {
        Self::new(OptKind::Switch { target, value }, long_name, short_name)
    }

    pub fn value(
        long_name: &'static str,
        short_name: Option<char>,
        target: fn(&mut T) -> &mut Option<String>,
        value_name: &'static str,
    ) -> Self {
        let mut spec = Self::new(OptKind::Value { target }, long_name, short_name);
        spec.value_name = value_name;
        spec
    }

    pub fn arg(name: &'static str, target: fn(&mut T) -> &mut Option<String>) -> Self {
        let mut spec = Self::new(OptKind::Arg { target }, name, None);
        spec.value_name = name;
        spec
    }

    pub fn var_args(name: &'static str, target: fn(&mut T) -> &mut Vec<String>) -> Self {
        let mut spec = Self::new(OptKind::VarArgs { target }, name, None);
        spec.value_name = name;
        spec
    }

    pub fn literal() -> Self {
        Self::new(OptKind::Literal, "", None)
    }

    pub fn help(mut self, text: &'static str) -> Self {
        self.help_text = text;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.flags = self.flags | OptFlags::HIDDEN;
        self
    }

    pub fn required(mut self) -> Self {
        self.flags = self.flags | OptFlags::REQUIRED;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(OptFlags::HIDDEN)
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(OptFlags::REQUIRED)
    }

    /// True for rows bound by position rather than by a flag name.
    pub fn is_positional(&self) -> bool {
        matches!(self.kind, OptKind::Arg { .. } | OptKind::VarArgs { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            OptKind::Switch { .. } => "switch",
            OptKind::Value { .. } => "value",
            OptKind::Arg { .. } => "arg",
            OptKind::VarArgs { .. } => "args",
            OptKind::Literal => "literal",
        }
    }

    /// Name used in error messages: `--branch`, `-b` or `repository`.
    pub fn display_name(&self) -> String {
        match self.kind {
            OptKind::Arg { .. } | OptKind::VarArgs { .. } => self.long_name.to_string(),
            OptKind::Literal => "--".to_string(),
            _ if !self.long_name.is_empty() => format!("--{}", self.long_name),
            _ => self
                .short_name
                .map(|c| format!("-{c}"))
                .unwrap_or_default(),
        }
    }
}

impl<T> fmt::Debug for OptionSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("kind", &self.kind_name())
            .field("long_name", &self.long_name)
            .field("short_name", &self.short_name)
            .field("value_name", &self.value_name)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Check the structural rules of a table: at most one literal separator, and
/// nothing may follow the variadic argument.
pub fn validate_table<T>(specs: &[OptionSpec<T>]) -> Result<(), DomainError> {
    let literals = specs
        .iter()
        .filter(|s| matches!(s.kind, OptKind::Literal))
        .count();
    if literals > 1 {
        return Err(DomainError::DuplicateLiteral);
    }

    if let Some(pos) = specs
        .iter()
        .position(|s| matches!(s.kind, OptKind::VarArgs { .. }))
    {
        if let Some(after) = specs.get(pos + 1) {
            return Err(DomainError::RowAfterVarArgs(after.display_name()));
        }
    }

    Ok(())
}
