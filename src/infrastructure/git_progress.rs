//! Translation of `git clone --progress` stderr into progress callbacks
//!
//! git writes its status to stderr as `\r`/`\n` terminated lines. Lines from
//! the remote carry a `remote: ` prefix and become sideband messages; the
//! local `Receiving objects` and `Resolving deltas` counters become
//! [`TransferStats`] updates. Anything else is kept as a diagnostic.

use std::ops::ControlFlow;

use regex::Regex;
use tracing::trace;

use crate::domain::progress::BYTE_UNITS;
use crate::domain::TransferStats;
use crate::infrastructure::traits::RemoteCallbacks;

const REMOTE_PREFIX: &[u8] = b"remote: ";
const FATAL_PREFIX: &str = "fatal: ";

/// Reassembles stderr chunks into lines and dispatches them.
pub struct GitProgressRelay {
    pending: Vec<u8>,
    stats: TransferStats,
    /// A report with every object received has been forwarded.
    received_all: bool,
    diagnostics: Vec<String>,
    receiving: Regex,
    resolving: Regex,
}

impl Default for GitProgressRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProgressRelay {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            stats: TransferStats::default(),
            received_all: false,
            diagnostics: Vec::new(),
            receiving: Regex::new(
                r"^Receiving objects:\s+\d+% \((\d+)/(\d+)\)(?:, ([0-9.]+) (B|KiB|MiB|GiB|TiB))?",
            )
            .unwrap(),
            resolving: Regex::new(r"^Resolving deltas:\s+\d+% \((\d+)/(\d+)\)").unwrap(),
        }
    }

    /// Last counters seen.
    pub fn stats(&self) -> &TransferStats {
        &self.stats
    }

    /// Lines that were neither remote output nor progress counters,
    /// without git's own `fatal: ` prefix.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Feed a chunk of stderr. Stops at the first callback asking to abort.
    pub fn feed(&mut self, data: &[u8], callbacks: &mut dyn RemoteCallbacks) -> ControlFlow<()> {
        for &byte in data {
            self.pending.push(byte);
            if byte == b'\r' || byte == b'\n' {
                let line = std::mem::take(&mut self.pending);
                let flow = self.dispatch(&line, callbacks);
                if flow.is_break() {
                    return flow;
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Dispatch an unterminated trailing line, if any.
    pub fn finish(&mut self, callbacks: &mut dyn RemoteCallbacks) -> ControlFlow<()> {
        if self.pending.is_empty() {
            return ControlFlow::Continue(());
        }
        let mut line = std::mem::take(&mut self.pending);
        line.push(b'\n');
        self.dispatch(&line, callbacks)
    }

    fn dispatch(&mut self, line: &[u8], callbacks: &mut dyn RemoteCallbacks) -> ControlFlow<()> {
        if let Some(rest) = line.strip_prefix(REMOTE_PREFIX) {
            return callbacks.sideband_progress(rest);
        }

        let text = String::from_utf8_lossy(line);
        let text = text.trim_end_matches(['\r', '\n']);

        if let Some(caps) = self.receiving.captures(text) {
            self.stats.received_objects = parse_count(caps.get(1).map(|m| m.as_str()));
            self.stats.total_objects = parse_count(caps.get(2).map(|m| m.as_str()));
            if let (Some(amount), Some(unit)) = (caps.get(3), caps.get(4)) {
                self.stats.received_bytes = to_bytes(amount.as_str(), unit.as_str());
            }
            // git repeats the 100% line with ", done."; the renderer has
            // already moved on to deltas by then
            if self.received_all {
                return ControlFlow::Continue(());
            }
            self.received_all = self.stats.received_objects == self.stats.total_objects;
            return callbacks.transfer_progress(&self.stats);
        }

        if let Some(caps) = self.resolving.captures(text) {
            self.stats.indexed_deltas = parse_count(caps.get(1).map(|m| m.as_str()));
            self.stats.total_deltas = parse_count(caps.get(2).map(|m| m.as_str()));
            return callbacks.transfer_progress(&self.stats);
        }

        if !text.trim().is_empty() && !text.starts_with("Cloning into") {
            trace!("git: {}", text);
            let message = text.strip_prefix(FATAL_PREFIX).unwrap_or(text);
            self.diagnostics.push(message.to_string());
        }
        ControlFlow::Continue(())
    }
}

fn parse_count(value: Option<&str>) -> u32 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn to_bytes(amount: &str, unit: &str) -> u64 {
    let amount: f64 = amount.parse().unwrap_or(0.0);
    let exponent = BYTE_UNITS.iter().position(|u| *u == unit).unwrap_or(0);
    (amount * 1024f64.powi(exponent as i32)) as u64
}
