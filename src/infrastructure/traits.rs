//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations (filesystem, version-control
//! engine), allowing services to be tested with fake implementations.

use std::io;
use std::ops::ControlFlow;
use std::path::Path;

use crate::domain::{CloneRequest, TransferStats};
use crate::infrastructure::EngineError;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a directory has no entries.
    fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and all its contents.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove everything inside a directory, keeping the directory itself.
    fn remove_dir_contents(&self, path: &Path) -> io::Result<()>;
}

/// Progress callbacks handed to the engine for one transfer.
///
/// Returning `Break` asks the engine to abort the operation.
pub trait RemoteCallbacks {
    /// Free-form status text sent by the remote.
    fn sideband_progress(&mut self, data: &[u8]) -> ControlFlow<()>;

    /// Object and delta counters.
    fn transfer_progress(&mut self, stats: &TransferStats) -> ControlFlow<()>;
}

/// Version-control engine abstraction.
pub trait CloneEngine: Send + Sync {
    /// Clone `request.remote` into the existing directory `destination`,
    /// reporting progress through `callbacks`.
    fn clone_repository(
        &self,
        request: &CloneRequest,
        destination: &Path,
        callbacks: &mut dyn RemoteCallbacks,
    ) -> Result<(), EngineError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn remove_dir_contents(&self, path: &Path) -> io::Result<()> {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(entry.path())?;
            } else {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
