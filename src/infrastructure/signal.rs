//! Interrupt handling

use tracing::debug;

use crate::application::CancellationToken;
use crate::infrastructure::{InfraError, InfraResult};

/// Trip `token` on Ctrl-C instead of terminating the process.
///
/// The handler only flips the token; the running command notices it at its
/// next check, unwinds and lets its scoped cleanup run.
pub fn install_interrupt_handler(token: CancellationToken) -> InfraResult<()> {
    ctrlc::set_handler(move || token.cancel()).map_err(|e| InfraError::Signal {
        message: e.to_string(),
    })?;
    debug!("install_interrupt_handler: installed");
    Ok(())
}
