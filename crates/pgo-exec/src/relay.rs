use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use pgo_model::{ChildOutcome, ShutdownKind};

use crate::error::ExecError;
use crate::proc::ChildHandle;

/// Shutdown protocol state for one supervised run.
///
/// `Running → ShuttingDown → Terminated`, or `Running → Terminated` directly
/// when the worker exits on its own. No transition leaves `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Running,
    ShuttingDown,
    Terminated,
}

impl RelayState {
    /// Record an externally delivered shutdown signal. Returns `true` when
    /// the signal must be forwarded to the child — only on the first
    /// delivery; repeats while shutdown is in progress are swallowed so the
    /// child's cleanup is never raced.
    pub fn on_signal(&mut self) -> bool {
        match self {
            RelayState::Running => {
                *self = RelayState::ShuttingDown;
                true
            }
            RelayState::ShuttingDown | RelayState::Terminated => false,
        }
    }

    /// Record the child's exit. Terminal.
    pub fn on_exit(&mut self) {
        *self = RelayState::Terminated;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RelayState::Terminated)
    }
}

/// Install handlers for the interceptable termination signals (SIGTERM,
/// SIGINT) and bridge them into a channel of [`ShutdownKind`] events.
///
/// SIGKILL cannot be intercepted by definition: if the host forcibly kills
/// the supervisor itself, no upload happens. Accepted gap.
pub fn host_signals() -> std::io::Result<mpsc::Receiver<ShutdownKind>> {
    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        loop {
            let kind = tokio::select! {
                _ = term.recv() => ShutdownKind::Terminate,
                _ = int.recv() => ShutdownKind::Interrupt,
            };
            if tx.send(kind).await.is_err() {
                break;
            }
        }
    });

    Ok(rx)
}

/// Drive the worker to termination.
///
/// Blocks until the child exits, either naturally or after an external
/// shutdown request arrives on `signals`. The first request is forwarded to
/// the child exactly once with identical signal semantics; afterwards the
/// relay commits to waiting for exit — there is no further cancellation
/// path. With `grace` set, a child still alive that long after the forward
/// is escalated to SIGKILL and then reaped.
pub async fn supervise(
    child: &mut ChildHandle,
    signals: &mut mpsc::Receiver<ShutdownKind>,
    grace: Option<Duration>,
) -> Result<ChildOutcome, ExecError> {
    let mut state = RelayState::Running;
    let mut requested: Option<ShutdownKind> = None;

    let status = loop {
        if state == RelayState::ShuttingDown {
            break drain_until_exit(child, signals, grace).await?;
        }
        tokio::select! {
            status = child.wait() => break status?,
            sig = signals.recv() => match sig {
                Some(kind) => {
                    if state.on_signal() {
                        info!(
                            target: "pgod.relay",
                            signal = kind.as_str(),
                            pid = child.pid(),
                            "forwarding termination signal to worker"
                        );
                        child.signal(kind)?;
                        requested = Some(kind);
                    }
                }
                // Signal source gone; nothing external can arrive anymore.
                None => break child.wait().await?,
            },
        }
    };

    state.on_exit();
    debug_assert!(state.is_terminal());
    log_exit(status, requested);
    Ok(ChildOutcome::new(status.code(), requested))
}

/// Wait for exit after the shutdown was forwarded. Repeated signals are
/// observed and dropped, never re-forwarded.
async fn drain_until_exit(
    child: &mut ChildHandle,
    signals: &mut mpsc::Receiver<ShutdownKind>,
    grace: Option<Duration>,
) -> Result<ExitStatus, ExecError> {
    let deadline = grace.map(|d| Instant::now() + d);
    loop {
        tokio::select! {
            status = child.wait() => return status,
            _ = deadline_elapsed(deadline) => return escalate_and_reap(child).await,
            sig = signals.recv() => match sig {
                Some(kind) => {
                    debug!(target: "pgod.relay", signal = kind.as_str(), "shutdown already in progress; ignoring");
                }
                // Signal source gone; only the child or the deadline remain.
                None => tokio::select! {
                    status = child.wait() => return status,
                    _ = deadline_elapsed(deadline) => return escalate_and_reap(child).await,
                },
            },
        }
    }
}

/// Resolves when the grace deadline passes; pends forever without one.
async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn escalate_and_reap(child: &mut ChildHandle) -> Result<ExitStatus, ExecError> {
    warn!(target: "pgod.relay", pid = child.pid(), "grace period expired; escalating to kill");
    child.force_kill().await;
    child.wait().await
}

fn log_exit(status: ExitStatus, requested: Option<ShutdownKind>) {
    match status.code() {
        Some(0) => info!(target: "pgod.relay", requested = ?requested.map(|k| k.as_str()), "worker exited cleanly"),
        Some(code) => warn!(target: "pgod.relay", code, "worker exited non-zero"),
        None => warn!(target: "pgod.relay", signal = status.signal(), "worker terminated by signal"),
    }
}
