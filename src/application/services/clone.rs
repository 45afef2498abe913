//! Clone service
//!
//! Validates and prepares the destination directory, runs the engine and
//! removes whatever it left behind if the clone does not complete.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, CancellationToken, IoResultExt};
use crate::domain::CloneRequest;
use crate::infrastructure::traits::{CloneEngine, FileSystem, RemoteCallbacks};

/// A destination directory prepared for a clone.
///
/// Until [`commit`](Self::commit) is called, dropping the guard removes what
/// the clone created: the whole directory if the guard created it, only its
/// contents if it existed (empty) beforehand.
pub struct DestinationGuard {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    existed: bool,
    armed: bool,
}

impl DestinationGuard {
    fn new(fs: Arc<dyn FileSystem>, path: PathBuf, existed: bool) -> Self {
        Self {
            fs,
            path,
            existed,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory was already there before the clone.
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Keep the destination; returns its path.
    pub fn commit(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Remove the partial destination now. Runs at most once.
    pub fn cleanup(&mut self) -> std::io::Result<()> {
        if !self.armed {
            return Ok(());
        }
        self.armed = false;

        if !self.fs.is_dir(&self.path) {
            return Ok(());
        }

        debug!(
            "cleanup: path={}, existed={}",
            self.path.display(),
            self.existed
        );
        if self.existed {
            self.fs.remove_dir_contents(&self.path)
        } else {
            self.fs.remove_dir_all(&self.path)
        }
    }
}

impl Drop for DestinationGuard {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("could not remove '{}': {}", self.path.display(), e);
        }
    }
}

/// Service for cloning a repository into a local directory.
pub struct CloneService {
    fs: Arc<dyn FileSystem>,
    engine: Arc<dyn CloneEngine>,
    cancel: CancellationToken,
}

impl CloneService {
    /// Create a new clone service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        engine: Arc<dyn CloneEngine>,
        cancel: CancellationToken,
    ) -> Self {
        Self { fs, engine, cancel }
    }

    /// Check that `path` is absent or an empty directory.
    ///
    /// Returns whether it already exists.
    pub fn validate_destination(&self, path: &Path) -> ApplicationResult<bool> {
        if !self.fs.exists(path) {
            return Ok(false);
        }

        let empty_dir = self.fs.is_dir(path)
            && self
                .fs
                .is_empty_dir(path)
                .with_path_context("could not read directory", path)?;
        if !empty_dir {
            return Err(ApplicationError::DestinationNotEmpty(path.to_path_buf()));
        }

        Ok(true)
    }

    /// Validate the destination and create it if needed.
    #[instrument(skip(self))]
    pub fn prepare_destination(&self, request: &CloneRequest) -> ApplicationResult<DestinationGuard> {
        let path = request.destination();
        let existed = self.validate_destination(&path)?;
        self.cancel.check()?;

        if !existed {
            self.fs
                .create_dir_all(&path)
                .with_path_context("could not create directory", &path)?;
        }

        debug!("prepare_destination: path={}, existed={}", path.display(), existed);
        Ok(DestinationGuard::new(Arc::clone(&self.fs), path, existed))
    }

    /// Run the engine into a prepared destination.
    ///
    /// On any failure the partial clone is removed before returning. If that
    /// removal fails as well the error is [`ApplicationError::CleanupFailed`].
    #[instrument(skip(self, destination, callbacks))]
    pub fn clone_into(
        &self,
        mut destination: DestinationGuard,
        request: &CloneRequest,
        callbacks: &mut dyn RemoteCallbacks,
    ) -> ApplicationResult<PathBuf> {
        let outcome = self.cancel.check().and_then(|()| {
            let result = self
                .engine
                .clone_repository(request, destination.path(), callbacks);
            if self.cancel.is_cancelled() {
                return Err(ApplicationError::Cancelled);
            }
            result.map_err(ApplicationError::from)
        });

        let cause = match outcome {
            Ok(()) => return Ok(destination.commit()),
            Err(cause) => cause,
        };
        match destination.cleanup() {
            Ok(()) => Err(cause),
            Err(source) => Err(ApplicationError::CleanupFailed {
                cause: Box::new(cause),
                path: destination.path().to_path_buf(),
                source,
            }),
        }
    }

    /// Prepare the destination and clone into it.
    pub fn clone_repository(
        &self,
        request: &CloneRequest,
        callbacks: &mut dyn RemoteCallbacks,
    ) -> ApplicationResult<PathBuf> {
        let destination = self.prepare_destination(request)?;
        self.clone_into(destination, request, callbacks)
    }
}
