//! Option parser
//!
//! Interprets an argument vector against an option table in a single
//! left-to-right pass. [`OptParser`] yields one outcome per recognised token so
//! callers can stop early (the dispatcher stops at the command name); [`parse`]
//! drives it to the end and enforces required rows.
//!
//! Short switches may be bundled (`-nq` is `-n -q`). A value option inside a
//! bundle takes the rest of the token (`-bmain`) or, if nothing remains, the
//! next token. Long value options also accept `--name=value`.

use tracing::trace;

use crate::domain::error::DomainError;
use crate::domain::opt::{OptKind, OptionSpec};

/// A token (or bundled short flag) matched against a table row.
#[derive(Debug)]
pub struct Matched<'s, T> {
    pub spec: &'s OptionSpec<T>,
    /// The value consumed for `Value`, `Arg` and `VarArgs` rows.
    pub value: Option<String>,
}

/// Incremental parser over `args`, writing matched values into `target`.
///
/// Values already written stay written when a later token fails.
pub struct OptParser<'s, 'a, 't, T> {
    specs: &'s [OptionSpec<T>],
    args: &'a [String],
    target: &'t mut T,
    idx: usize,
    /// Byte offset into `args[idx]` while walking a short-option bundle.
    short_offset: Option<usize>,
    /// First table row that may still take a positional.
    next_positional: usize,
    in_literal: bool,
    seen: Vec<bool>,
    finished: bool,
}

impl<'s, 'a, 't, T> OptParser<'s, 'a, 't, T> {
    pub fn new(specs: &'s [OptionSpec<T>], args: &'a [String], target: &'t mut T) -> Self {
        Self {
            specs,
            args,
            target,
            idx: 0,
            short_offset: None,
            next_positional: 0,
            in_literal: false,
            seen: vec![false; specs.len()],
            finished: false,
        }
    }

    /// Index of the next unconsumed token.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Tokens not consumed yet.
    pub fn remaining(&self) -> &'a [String] {
        self.args.get(self.idx..).unwrap_or(&[])
    }

    /// Fail if a `Required` row never received a value.
    pub fn check_required(&self) -> Result<(), DomainError> {
        match self
            .specs
            .iter()
            .zip(&self.seen)
            .find(|(spec, seen)| spec.is_required() && !**seen)
        {
            Some((spec, _)) => Err(DomainError::MissingArgument(spec.display_name())),
            None => Ok(()),
        }
    }

    fn step(&mut self) -> Option<Result<Matched<'s, T>, DomainError>> {
        if let Some(offset) = self.short_offset {
            return Some(self.short_option(offset));
        }

        let args = self.args;
        let token = args.get(self.idx)?.as_str();

        if self.in_literal {
            return Some(self.positional(token));
        }

        if token == "--" {
            return Some(self.literal(token));
        }

        if let Some(long) = token.strip_prefix("--") {
            return Some(self.long_option(token, long));
        }

        if token.len() > 1 && token.starts_with('-') {
            return Some(self.short_option(1));
        }

        Some(self.positional(token))
    }

    fn literal(&mut self, token: &str) -> Result<Matched<'s, T>, DomainError> {
        let specs = self.specs;
        let i = specs
            .iter()
            .position(|s| matches!(s.kind, OptKind::Literal))
            .ok_or_else(|| DomainError::UnknownOption(token.to_string()))?;

        self.in_literal = true;
        self.idx += 1;
        self.seen[i] = true;
        Ok(Matched {
            spec: &specs[i],
            value: None,
        })
    }

    fn long_option(&mut self, token: &str, long: &str) -> Result<Matched<'s, T>, DomainError> {
        let (name, inline) = match long.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (long, None),
        };

        let specs = self.specs;
        let i = specs
            .iter()
            .position(|s| {
                !s.long_name.is_empty()
                    && s.long_name == name
                    && matches!(s.kind, OptKind::Switch { .. } | OptKind::Value { .. })
            })
            .ok_or_else(|| DomainError::UnknownOption(token.to_string()))?;
        let spec = &specs[i];

        match spec.kind {
            OptKind::Switch { target, value } => {
                if inline.is_some() {
                    return Err(DomainError::UnknownOption(token.to_string()));
                }
                *target(self.target) = value;
                self.idx += 1;
                self.seen[i] = true;
                Ok(Matched { spec, value: None })
            }
            OptKind::Value { target } => {
                let value = match inline {
                    Some(v) => {
                        self.idx += 1;
                        v.to_string()
                    }
                    None => {
                        let v = self
                            .args
                            .get(self.idx + 1)
                            .ok_or_else(|| DomainError::MissingValue(token.to_string()))?;
                        self.idx += 2;
                        v.clone()
                    }
                };
                *target(self.target) = Some(value.clone());
                self.seen[i] = true;
                Ok(Matched {
                    spec,
                    value: Some(value),
                })
            }
            _ => Err(DomainError::UnknownOption(token.to_string())),
        }
    }

    fn short_option(&mut self, offset: usize) -> Result<Matched<'s, T>, DomainError> {
        let args = self.args;
        let token = args[self.idx].as_str();
        let Some(c) = token.get(offset..).and_then(|rest| rest.chars().next()) else {
            self.short_offset = None;
            return Err(DomainError::UnknownOption(token.to_string()));
        };
        let flag = format!("-{c}");
        let after = offset + c.len_utf8();

        let specs = self.specs;
        let i = specs
            .iter()
            .position(|s| {
                s.short_name == Some(c)
                    && matches!(s.kind, OptKind::Switch { .. } | OptKind::Value { .. })
            })
            .ok_or_else(|| DomainError::UnknownOption(flag.clone()))?;
        let spec = &specs[i];

        match spec.kind {
            OptKind::Switch { target, value } => {
                *target(self.target) = value;
                if after < token.len() {
                    self.short_offset = Some(after);
                } else {
                    self.short_offset = None;
                    self.idx += 1;
                }
                self.seen[i] = true;
                Ok(Matched { spec, value: None })
            }
            OptKind::Value { target } => {
                self.short_offset = None;
                let value = if after < token.len() {
                    self.idx += 1;
                    token[after..].to_string()
                } else {
                    let v = args
                        .get(self.idx + 1)
                        .ok_or(DomainError::MissingValue(flag))?;
                    self.idx += 2;
                    v.clone()
                };
                *target(self.target) = Some(value.clone());
                self.seen[i] = true;
                Ok(Matched {
                    spec,
                    value: Some(value),
                })
            }
            _ => Err(DomainError::UnknownOption(flag)),
        }
    }

    fn positional(&mut self, token: &str) -> Result<Matched<'s, T>, DomainError> {
        let specs = self.specs;
        let (i, spec) = specs
            .iter()
            .enumerate()
            .skip(self.next_positional)
            .find(|(_, s)| s.is_positional())
            .ok_or_else(|| DomainError::UnexpectedArgument(token.to_string()))?;

        match spec.kind {
            OptKind::Arg { target } => {
                *target(self.target) = Some(token.to_string());
                self.next_positional = i + 1;
            }
            OptKind::VarArgs { target } => {
                target(self.target).push(token.to_string());
                self.next_positional = i;
            }
            _ => return Err(DomainError::UnexpectedArgument(token.to_string())),
        }

        self.idx += 1;
        self.seen[i] = true;
        Ok(Matched {
            spec,
            value: Some(token.to_string()),
        })
    }
}

impl<'s, 'a, 't, T> Iterator for OptParser<'s, 'a, 't, T> {
    type Item = Result<Matched<'s, T>, DomainError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.step();
        match &item {
            Some(Ok(m)) => trace!(spec = m.spec.long_name, idx = self.idx, "matched"),
            Some(Err(e)) => {
                trace!(error = %e, "parse stopped");
                self.finished = true;
            }
            None => self.finished = true,
        }
        item
    }
}

/// Parse the whole of `args` against `specs`, writing into `target`.
pub fn parse<T>(specs: &[OptionSpec<T>], args: &[String], target: &mut T) -> Result<(), DomainError> {
    let mut parser = OptParser::new(specs, args, target);
    for result in parser.by_ref() {
        result?;
    }
    parser.check_required()
}
