//! Bridges engine callbacks to the progress renderer

use std::io::Write;
use std::ops::ControlFlow;

use tracing::debug;

use crate::application::CancellationToken;
use crate::domain::{ProgressRenderer, TransferStats};
use crate::infrastructure::traits::RemoteCallbacks;

/// Engine callbacks for one transfer.
///
/// Asks the engine to abort once the cancellation token is tripped or the
/// output can no longer be written. Without a renderer (quiet mode) only the
/// cancellation check remains.
pub struct TransferReporter<W: Write> {
    renderer: Option<ProgressRenderer<W>>,
    cancel: CancellationToken,
}

impl<W: Write> TransferReporter<W> {
    pub fn new(renderer: Option<ProgressRenderer<W>>, cancel: CancellationToken) -> Self {
        Self { renderer, cancel }
    }

    /// Reporter that draws nothing.
    pub fn quiet(cancel: CancellationToken) -> Self {
        Self::new(None, cancel)
    }

    pub fn renderer(&self) -> Option<&ProgressRenderer<W>> {
        self.renderer.as_ref()
    }

    pub fn into_renderer(self) -> Option<ProgressRenderer<W>> {
        self.renderer
    }
}

impl<W: Write> RemoteCallbacks for TransferReporter<W> {
    fn sideband_progress(&mut self, data: &[u8]) -> ControlFlow<()> {
        if self.cancel.is_cancelled() {
            return ControlFlow::Break(());
        }
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.on_sideband_message(data) {
                debug!("sideband_progress: write failed: {}", e);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn transfer_progress(&mut self, stats: &TransferStats) -> ControlFlow<()> {
        if self.cancel.is_cancelled() {
            return ControlFlow::Break(());
        }
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.on_transfer_progress(stats) {
                debug!("transfer_progress: write failed: {}", e);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
