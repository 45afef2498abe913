//! Tests for CloneService
//!
//! The engine is faked; the filesystem is real, inside a TempDir.

use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use git2_cli::application::services::CloneService;
use git2_cli::application::{ApplicationError, CancellationToken, TransferReporter};
use git2_cli::domain::{CloneRequest, Phase, ProgressRenderer, TransferStats};
use git2_cli::infrastructure::traits::{CloneEngine, FileSystem, RealFileSystem, RemoteCallbacks};
use git2_cli::infrastructure::EngineError;
use git2_cli::util::testing;

#[derive(Clone, Copy)]
enum Outcome {
    Succeed,
    Fail,
    /// Trip the token, then keep reporting progress.
    Interrupt,
}

/// Writes a file into the destination, reports a short transfer and then
/// behaves according to `outcome`.
struct FakeEngine {
    outcome: Outcome,
    cancel: CancellationToken,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeEngine {
    fn new(outcome: Outcome, cancel: CancellationToken) -> Self {
        Self {
            outcome,
            cancel,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl CloneEngine for FakeEngine {
    fn clone_repository(
        &self,
        request: &CloneRequest,
        destination: &Path,
        callbacks: &mut dyn RemoteCallbacks,
    ) -> Result<(), EngineError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.remote.clone(), destination.to_path_buf()));
        fs::write(destination.join("HEAD"), "ref: refs/heads/main\n").map_err(EngineError::Spawn)?;

        if let Outcome::Interrupt = self.outcome {
            self.cancel.cancel();
        }

        let steps = [
            TransferStats {
                received_objects: 1,
                total_objects: 2,
                received_bytes: 10,
                ..TransferStats::default()
            },
            TransferStats {
                received_objects: 2,
                total_objects: 2,
                received_bytes: 20,
                ..TransferStats::default()
            },
            TransferStats {
                received_objects: 2,
                total_objects: 2,
                received_bytes: 20,
                ..TransferStats::default()
            },
        ];
        if callbacks.sideband_progress(b"Counting objects: 2, done.\n").is_break() {
            return Err(EngineError::Aborted);
        }
        for stats in &steps {
            if let ControlFlow::Break(()) = callbacks.transfer_progress(stats) {
                return Err(EngineError::Aborted);
            }
        }

        match self.outcome {
            Outcome::Fail => Err(EngineError::Failed {
                message: "remote hung up".into(),
                exit_code: Some(128),
            }),
            _ => Ok(()),
        }
    }
}

fn service(outcome: Outcome) -> (CloneService, Arc<FakeEngine>, CancellationToken) {
    testing::init_test_setup();
    let cancel = CancellationToken::new();
    let engine = Arc::new(FakeEngine::new(outcome, cancel.clone()));
    let service = CloneService::new(Arc::new(RealFileSystem), engine.clone(), cancel.clone());
    (service, engine, cancel)
}

/// Real filesystem whose removals always fail.
struct StickyFileSystem;

impl FileSystem for StickyFileSystem {
    fn exists(&self, path: &Path) -> bool {
        RealFileSystem.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        RealFileSystem.is_dir(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        RealFileSystem.is_empty_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        RealFileSystem.create_dir_all(path)
    }

    fn remove_dir_all(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }

    fn remove_dir_contents(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }
}

fn request_into(dir: &Path) -> CloneRequest {
    let mut request = CloneRequest::new("https://example.com/project.git");
    request.local_path = Some(dir.to_path_buf());
    request
}

// ============================================================
// validate_destination()
// ============================================================

#[test]
fn given_missing_path_when_validating_then_ok_and_not_existing() {
    let temp = TempDir::new().unwrap();
    let (service, _, _) = service(Outcome::Succeed);

    let existed = service.validate_destination(&temp.path().join("new")).unwrap();

    assert!(!existed);
}

#[test]
fn given_empty_directory_when_validating_then_ok_and_existing() {
    let temp = TempDir::new().unwrap();
    let (service, _, _) = service(Outcome::Succeed);

    let existed = service.validate_destination(temp.path()).unwrap();

    assert!(existed);
}

#[test]
fn given_non_empty_directory_when_validating_then_destination_not_empty() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("README"), "hello").unwrap();
    let (service, _, _) = service(Outcome::Succeed);

    // Act
    let err = service.validate_destination(temp.path()).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::DestinationNotEmpty(_)));
    assert_eq!(
        err.to_string(),
        format!(
            "destination path '{}' already exists and is not an empty directory.",
            temp.path().display()
        )
    );
}

#[test]
fn given_regular_file_when_validating_then_destination_not_empty() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("taken");
    fs::write(&file, "x").unwrap();
    let (service, _, _) = service(Outcome::Succeed);

    let err = service.validate_destination(&file).unwrap_err();

    assert!(matches!(err, ApplicationError::DestinationNotEmpty(_)));
}

// ============================================================
// clone_repository()
// ============================================================

#[test]
fn given_new_destination_when_clone_succeeds_then_directory_kept() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    let (service, engine, _) = service(Outcome::Succeed);
    let mut reporter = TransferReporter::new(
        Some(ProgressRenderer::new(Vec::new())),
        CancellationToken::new(),
    );

    // Act
    let path = service.clone_repository(&request_into(&dest), &mut reporter).unwrap();

    // Assert
    assert_eq!(path, dest);
    assert!(dest.join("HEAD").exists());
    let calls = engine.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[("https://example.com/project.git".to_string(), dest.clone())]
    );

    let renderer = reporter.into_renderer().unwrap();
    assert_eq!(renderer.state().phase, Phase::Done);
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(text.starts_with("remote: Counting objects: 2, done.\n"));
    assert!(text.contains("Receiving objects: 100% (2/2)"));
    assert!(text.ends_with("Resolving deltas: 100% (0/0), done.\n"));
}

#[test]
fn given_new_destination_when_engine_fails_then_directory_removed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    let (service, _, _) = service(Outcome::Fail);
    let mut reporter: TransferReporter<Vec<u8>> = TransferReporter::quiet(CancellationToken::new());

    // Act
    let err = service.clone_repository(&request_into(&dest), &mut reporter).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Engine(EngineError::Failed { .. })
    ));
    assert_eq!(err.to_string(), "could not clone: remote hung up");
    assert!(!dest.exists());
}

#[test]
fn given_engine_failure_when_cleanup_also_fails_then_both_reported() {
    // Arrange
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    let cancel = CancellationToken::new();
    let engine = Arc::new(FakeEngine::new(Outcome::Fail, cancel.clone()));
    let service = CloneService::new(Arc::new(StickyFileSystem), engine, cancel);
    let mut reporter: TransferReporter<Vec<u8>> = TransferReporter::quiet(CancellationToken::new());

    // Act
    let err = service.clone_repository(&request_into(&dest), &mut reporter).unwrap_err();

    // Assert
    assert_eq!(err.to_string(), "could not clone: remote hung up");
    assert!(matches!(
        err.primary(),
        ApplicationError::Engine(EngineError::Failed { .. })
    ));
    match err {
        ApplicationError::CleanupFailed { path, source, .. } => {
            assert_eq!(path, dest);
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(dest.exists());
}

#[test]
fn given_existing_empty_destination_when_engine_fails_then_only_contents_removed() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    fs::create_dir(&dest).unwrap();
    let (service, _, _) = service(Outcome::Fail);
    let mut reporter: TransferReporter<Vec<u8>> = TransferReporter::quiet(CancellationToken::new());

    let result = service.clone_repository(&request_into(&dest), &mut reporter);

    assert!(result.is_err());
    assert!(dest.is_dir());
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
}

#[test]
fn given_non_empty_destination_when_cloning_then_engine_never_runs() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keep.txt"), "mine").unwrap();
    let (service, engine, _) = service(Outcome::Succeed);
    let mut reporter: TransferReporter<Vec<u8>> = TransferReporter::quiet(CancellationToken::new());

    let err = service
        .clone_repository(&request_into(temp.path()), &mut reporter)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::DestinationNotEmpty(_)));
    assert!(engine.calls.lock().unwrap().is_empty());
    assert!(temp.path().join("keep.txt").exists());
}

// ============================================================
// cancellation
// ============================================================

#[test]
fn given_interrupt_during_transfer_when_cloning_then_cancelled_and_cleaned_up() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    let (service, _, cancel) = service(Outcome::Interrupt);
    let mut reporter = TransferReporter::new(Some(ProgressRenderer::new(Vec::new())), cancel.clone());

    // Act
    let err = service.clone_repository(&request_into(&dest), &mut reporter).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::Cancelled));
    assert!(!dest.exists());
    let renderer = reporter.into_renderer().unwrap();
    assert_eq!(renderer.state().phase, Phase::None);
}

#[test]
fn given_token_already_tripped_when_preparing_then_nothing_created() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    let (service, engine, cancel) = service(Outcome::Succeed);
    cancel.cancel();

    let err = service.prepare_destination(&request_into(&dest)).err().unwrap();

    assert!(matches!(err, ApplicationError::Cancelled));
    assert!(!dest.exists());
    assert!(engine.calls.lock().unwrap().is_empty());
}

// ============================================================
// DestinationGuard
// ============================================================

#[test]
fn given_prepared_destination_when_guard_dropped_then_created_directory_removed() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("nested/project");
    let (service, _, _) = service(Outcome::Succeed);

    let guard = service.prepare_destination(&request_into(&dest)).unwrap();
    assert!(dest.is_dir());
    assert!(!guard.existed());
    drop(guard);

    assert!(!dest.exists());
}

#[test]
fn given_prepared_destination_when_committed_then_kept() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("project");
    let (service, _, _) = service(Outcome::Succeed);

    let guard = service.prepare_destination(&request_into(&dest)).unwrap();
    let path = guard.commit();

    assert_eq!(path, dest);
    assert!(dest.is_dir());
}
