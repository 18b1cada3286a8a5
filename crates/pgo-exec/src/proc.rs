use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::trace;

use pgo_model::{ShutdownKind, WorkerSpec};

use crate::error::ExecError;

/// Handle to the one running worker process.
///
/// Owns the child exclusively: liveness queries, signal delivery and the
/// exit-status wait all go through here.
pub struct ChildHandle {
    child: Child,
    started_at: Instant,
    program: String,
}

/// Start the worker described by `spec` with stdio inherited, so operators
/// see its output directly in the supervisor's own streams.
pub fn spawn(spec: &WorkerSpec) -> Result<ChildHandle, ExecError> {
    let program = spec.program.display().to_string();
    trace!(target: "pgod.proc", %program, args = ?spec.args, "spawn");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }

    let child = cmd.spawn().map_err(|source| ExecError::Launch {
        program: program.clone(),
        source,
    })?;

    Ok(ChildHandle {
        child,
        started_at: Instant::now(),
        program,
    })
}

impl ChildHandle {
    /// OS process id; `None` once the child has been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Instant the worker was spawned; its distance to now is the run time.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Deliver `kind` to the child with the exact host signal semantics
    /// (SIGINT stays SIGINT, SIGTERM stays SIGTERM), so the worker's own
    /// cleanup hooks fire the same way they would without a supervisor.
    pub fn signal(&self, kind: ShutdownKind) -> Result<(), ExecError> {
        let Some(pid) = self.child.id() else {
            // Already exited and reaped; nothing to deliver.
            return Ok(());
        };
        kill(Pid::from_raw(pid as i32), to_signal(kind)).map_err(|errno| ExecError::Signal {
            signal: kind.as_str(),
            pid,
            source: std::io::Error::from_raw_os_error(errno as i32),
        })
    }

    /// Block until the child exits and its status is reaped. Cancel-safe.
    pub async fn wait(&mut self) -> Result<ExitStatus, ExecError> {
        self.child.wait().await.map_err(ExecError::Wait)
    }

    /// Forceful SIGKILL; the error is ignored because the child may already
    /// be gone, which is the state we want anyway.
    pub async fn force_kill(&mut self) {
        let _ = self.child.kill().await;
    }
}

fn to_signal(kind: ShutdownKind) -> Signal {
    match kind {
        ShutdownKind::Interrupt => Signal::SIGINT,
        ShutdownKind::Terminate => Signal::SIGTERM,
        ShutdownKind::Kill => Signal::SIGKILL,
    }
}
