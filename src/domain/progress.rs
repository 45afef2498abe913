//! Transfer progress rendering
//!
//! Turns the two progress callbacks of a fetch (free-form sideband text from
//! the remote, and object/delta counters) into a self-overwriting terminal
//! status display. Lines ending in `\r` are redrawn in place; a shorter
//! redraw is padded with spaces so it fully covers the previous one.

use std::io::{self, Write};
use std::time::Instant;

pub const BYTE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
pub const RATE_UNITS: [&str; 5] = ["B/s", "KiB/s", "MiB/s", "GiB/s", "TiB/s"];

const SIDEBAND_PREFIX: &[u8] = b"remote: ";

/// Counters reported by the transfer engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub received_objects: u32,
    pub total_objects: u32,
    pub indexed_deltas: u32,
    pub total_deltas: u32,
    pub received_bytes: u64,
}

/// Stage of a transfer. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    #[default]
    None,
    Receiving,
    Resolving,
    Done,
}

/// Mutable display state, scoped to one command invocation.
#[derive(Debug, Default)]
pub struct ProgressState {
    pub phase: Phase,
    /// Partial output waiting for a `\r` or `\n`.
    pub current_line: Vec<u8>,
    /// Content length of the line drawn last, if it ended in `\r`.
    pub last_rendered_length: usize,
    pub receive_start: Option<Instant>,
    pub receive_finish: Option<Instant>,
}

/// Completion percentage, truncated. `0/0` counts as complete, `n/0` as not
/// started.
pub fn percent(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return if completed == 0 { 100 } else { 0 };
    }

    ((completed as f64 / total as f64) * 100.0) as u32
}

/// Scale `value` down by 1024 until it is at most 1024 or the ladder ends.
pub fn scale_units(mut value: f64, units: &[&'static str]) -> (f64, &'static str) {
    let mut idx = 0;
    while value > 1024.0 && idx + 1 < units.len() {
        value /= 1024.0;
        idx += 1;
    }
    (value, units.get(idx).copied().unwrap_or(""))
}

/// Renders progress callbacks onto `out`.
pub struct ProgressRenderer<W: Write> {
    out: W,
    state: ProgressState,
}

impl<W: Write> ProgressRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: ProgressState::default(),
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Relay text sent by the remote, prefixing each new line with `remote: `.
    pub fn on_sideband_message(&mut self, data: &[u8]) -> io::Result<()> {
        let mut rest = data;

        while !rest.is_empty() {
            let run_len = rest
                .iter()
                .position(|&b| b == b'\r' || b == b'\n')
                .map_or(rest.len(), |i| i + 1);
            let (run, tail) = rest.split_at(run_len);

            if self.state.current_line.is_empty() {
                self.emit(SIDEBAND_PREFIX)?;
            }
            self.emit(run)?;

            rest = tail;
        }

        Ok(())
    }

    pub fn on_transfer_progress(&mut self, stats: &TransferStats) -> io::Result<()> {
        self.on_transfer_progress_at(stats, Instant::now())
    }

    /// As [`on_transfer_progress`](Self::on_transfer_progress), with the
    /// current time supplied by the caller.
    pub fn on_transfer_progress_at(&mut self, stats: &TransferStats, now: Instant) -> io::Result<()> {
        if self.state.phase == Phase::None {
            self.state.phase = Phase::Receiving;
            self.state.receive_start = Some(now);
        }

        match self.state.phase {
            Phase::Receiving => {
                let received = stats.received_bytes as f64;
                let elapsed = self
                    .state
                    .receive_start
                    .map(|start| now.saturating_duration_since(start).as_secs_f64())
                    .unwrap_or(0.0);
                let rate = if elapsed > 0.0 { received / elapsed } else { 0.0 };

                let (received, received_unit) = scale_units(received, &BYTE_UNITS);
                let (rate, rate_unit) = scale_units(rate, &RATE_UNITS);

                let done = stats.received_objects == stats.total_objects;
                if done {
                    self.state.phase = Phase::Resolving;
                    self.state.receive_finish = Some(now);
                }

                let line = format!(
                    "Receiving objects: {:>3}% ({}/{}), {:.2} {} | {:.2} {}{}",
                    percent(stats.received_objects, stats.total_objects),
                    stats.received_objects,
                    stats.total_objects,
                    received,
                    received_unit,
                    rate,
                    rate_unit,
                    line_end(done),
                );
                self.emit(line.as_bytes())
            }
            Phase::Resolving => {
                let done = stats.indexed_deltas == stats.total_deltas;
                if done {
                    self.state.phase = Phase::Done;
                }

                let line = format!(
                    "Resolving deltas: {:>3}% ({}/{}){}",
                    percent(stats.indexed_deltas, stats.total_deltas),
                    stats.indexed_deltas,
                    stats.total_deltas,
                    line_end(done),
                );
                self.emit(line.as_bytes())
            }
            Phase::None | Phase::Done => Ok(()),
        }
    }

    /// Buffer `text`; once the buffer ends in a terminator, draw it.
    fn emit(&mut self, text: &[u8]) -> io::Result<()> {
        self.state.current_line.extend_from_slice(text);

        let Some(&terminator) = self.state.current_line.last() else {
            return Ok(());
        };
        if terminator != b'\r' && terminator != b'\n' {
            return Ok(());
        }

        let content_len = self.state.current_line.len() - 1;
        self.out.write_all(&self.state.current_line[..content_len])?;

        let padding = self.state.last_rendered_length.saturating_sub(content_len);
        if padding > 0 {
            self.out.write_all(" ".repeat(padding).as_bytes())?;
        }

        self.out.write_all(&[terminator])?;
        self.out.flush()?;

        self.state.last_rendered_length = if terminator == b'\r' { content_len } else { 0 };
        self.state.current_line.clear();
        Ok(())
    }
}

fn line_end(done: bool) -> &'static str {
    if done {
        ", done.\n"
    } else {
        "\r"
    }
}
