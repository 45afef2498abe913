//! Clone engine backed by the `git` executable

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::{debug, instrument, warn};

use crate::domain::CloneRequest;
use crate::infrastructure::git_progress::GitProgressRelay;
use crate::infrastructure::traits::{CloneEngine, RemoteCallbacks};
use crate::infrastructure::EngineError;

/// Runs `<program> clone --progress` and relays its stderr as progress.
#[derive(Debug, Clone)]
pub struct GitProcessEngine {
    program: String,
}

impl GitProcessEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, request: &CloneRequest, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("clone").arg("--progress");
        if request.bare {
            cmd.arg("--bare");
        }
        if !request.checkout {
            cmd.arg("--no-checkout");
        }
        if let Some(branch) = &request.branch {
            cmd.arg("--branch").arg(branch);
        }
        cmd.arg("--").arg(&request.remote).arg(destination);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

fn abort(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("abort: kill failed: {}", e);
    }
    child.wait().ok();
}

impl CloneEngine for GitProcessEngine {
    #[instrument(skip(self, callbacks))]
    fn clone_repository(
        &self,
        request: &CloneRequest,
        destination: &Path,
        callbacks: &mut dyn RemoteCallbacks,
    ) -> Result<(), EngineError> {
        let mut child = self
            .command(request, destination)
            .spawn()
            .map_err(EngineError::Spawn)?;

        let Some(mut stderr) = child.stderr.take() else {
            abort(&mut child);
            return Err(EngineError::Failed {
                message: "stderr of git was not captured".into(),
                exit_code: None,
            });
        };

        let mut relay = GitProgressRelay::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match stderr.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    abort(&mut child);
                    return Err(EngineError::Spawn(e));
                }
            };
            if relay.feed(&buf[..n], callbacks).is_break() {
                abort(&mut child);
                return Err(EngineError::Aborted);
            }
        }
        if relay.finish(callbacks).is_break() {
            abort(&mut child);
            return Err(EngineError::Aborted);
        }

        let status = child.wait().map_err(EngineError::Spawn)?;
        debug!("clone_repository: git exited with {}", status);

        if status.success() {
            for line in relay.diagnostics() {
                warn!("{}", line);
            }
            return Ok(());
        }

        let message = relay
            .diagnostics()
            .last()
            .cloned()
            .unwrap_or_else(|| format!("git exited with {status}"));
        Err(EngineError::Failed {
            message,
            exit_code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_request_options_when_building_command_then_passes_matching_flags() {
        let engine = GitProcessEngine::new("git");
        let mut request = CloneRequest::new("https://example/repo.git");
        request.bare = true;
        request.checkout = false;
        request.branch = Some("main".into());

        let cmd = engine.command(&request, Path::new("repo"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            args,
            vec![
                "clone",
                "--progress",
                "--bare",
                "--no-checkout",
                "--branch",
                "main",
                "--",
                "https://example/repo.git",
                "repo"
            ]
        );
    }
}
