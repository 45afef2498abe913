//! Usage text rendering for option tables

use std::io::Write;

use crate::domain::opt::{OptKind, OptionSpec};

/// Synopsis lines wrap at this column.
pub const USAGE_WIDTH: usize = 80;

fn synopsis_item<T>(spec: &OptionSpec<T>) -> Option<String> {
    if spec.is_hidden() {
        return None;
    }

    let flag = || {
        if spec.long_name.is_empty() {
            spec.short_name.map(|c| format!("-{c}")).unwrap_or_default()
        } else {
            format!("--{}", spec.long_name)
        }
    };

    let item = match spec.kind {
        OptKind::Switch { .. } => flag(),
        OptKind::Value { .. } => format!("{} <{}>", flag(), spec.value_name),
        OptKind::Arg { .. } => format!("<{}>", spec.value_name),
        OptKind::VarArgs { .. } => format!("<{}>...", spec.value_name),
        OptKind::Literal => "--".to_string(),
    };

    Some(if spec.is_required() {
        item
    } else {
        format!("[{item}]")
    })
}

/// Render the `usage:` synopsis, wrapped at [`USAGE_WIDTH`].
///
/// Without a command name this is the top-level synopsis of the program.
pub fn synopsis<T>(program: &str, command: Option<&str>, specs: &[OptionSpec<T>]) -> String {
    let prefix = match command {
        Some(cmd) => format!("usage: {program} {cmd}"),
        None => format!("usage: {program}"),
    };
    let indent = " ".repeat(prefix.len());

    let mut out = String::new();
    let mut line = prefix;
    let mut line_has_items = false;

    for item in specs.iter().filter_map(synopsis_item) {
        if line_has_items && line.len() + 1 + item.len() > USAGE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line = indent.clone();
        }
        line.push(' ');
        line.push_str(&item);
        line_has_items = true;
    }

    out.push_str(&line);
    out.push('\n');
    out
}

fn listing_form<T>(spec: &OptionSpec<T>) -> Option<String> {
    let flags = || match (spec.short_name, spec.long_name.is_empty()) {
        (Some(c), false) => format!("-{c}, --{}", spec.long_name),
        (Some(c), true) => format!("-{c}"),
        (None, _) => format!("    --{}", spec.long_name),
    };

    match spec.kind {
        OptKind::Switch { .. } => Some(flags()),
        OptKind::Value { .. } => Some(format!("{} <{}>", flags(), spec.value_name)),
        OptKind::Arg { .. } => Some(format!("<{}>", spec.value_name)),
        OptKind::VarArgs { .. } => Some(format!("<{}>...", spec.value_name)),
        OptKind::Literal => None,
    }
}

/// Render one line per visible row: its flag forms and help text.
pub fn option_listing<T>(specs: &[OptionSpec<T>]) -> String {
    let rows: Vec<(String, &str)> = specs
        .iter()
        .filter(|s| !s.is_hidden() && !s.help_text.is_empty())
        .filter_map(|s| listing_form(s).map(|form| (form, s.help_text)))
        .collect();

    let width = rows.iter().map(|(form, _)| form.len()).max().unwrap_or(0);

    rows.iter()
        .map(|(form, help)| format!("    {form:<width$}  {help}\n"))
        .collect()
}

/// Full usage text: synopsis, then the option listing if any row has help.
pub fn usage_text<T>(program: &str, command: Option<&str>, specs: &[OptionSpec<T>]) -> String {
    let mut text = synopsis(program, command, specs);
    let listing = option_listing(specs);
    if !listing.is_empty() {
        text.push('\n');
        text.push_str(&listing);
    }
    text
}

/// Write the usage text to `out`. Write failures are ignored.
pub fn print_usage<T>(
    out: &mut dyn Write,
    program: &str,
    command: Option<&str>,
    specs: &[OptionSpec<T>],
) {
    out.write_all(usage_text(program, command, specs).as_bytes())
        .ok();
    out.flush().ok();
}
