//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CloneService;
use crate::application::CancellationToken;
use crate::config::Settings;
use crate::infrastructure::git::GitProcessEngine;
use crate::infrastructure::traits::{CloneEngine, FileSystem, RealFileSystem};

/// Container holding everything a command handler needs.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Version-control engine
    pub engine: Arc<dyn CloneEngine>,

    /// Tripped by the interrupt handler
    pub cancel: CancellationToken,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, cancel: CancellationToken) -> Self {
        let engine = Arc::new(GitProcessEngine::new(settings.git_program.clone()));
        Self::with_deps(settings, Arc::new(RealFileSystem), engine, cancel)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        engine: Arc<dyn CloneEngine>,
        cancel: CancellationToken,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            engine,
            cancel,
        }
    }

    pub fn clone_service(&self) -> CloneService {
        CloneService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.engine),
            self.cancel.clone(),
        )
    }
}
