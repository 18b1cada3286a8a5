use serde::{Deserialize, Serialize};

/// Kind of shutdown requested for the worker.
///
/// `Interrupt` and `Terminate` are the interceptable termination signals the
/// supervisor relays to the child with identical semantics. `Kill` is the
/// forceful escalation used after a grace period expires; it is never
/// interceptable, by the child or by anyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShutdownKind {
    /// SIGINT-equivalent (operator Ctrl-C).
    Interrupt,
    /// SIGTERM-equivalent (orchestrator-initiated stop).
    Terminate,
    /// SIGKILL-equivalent (grace-period escalation).
    Kill,
}

impl ShutdownKind {
    /// Short symbolic identifier for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownKind::Interrupt => "interrupt",
            ShutdownKind::Terminate => "terminate",
            ShutdownKind::Kill => "kill",
        }
    }

    /// Whether the child can observe this signal and run its own cleanup.
    pub fn is_graceful(&self) -> bool {
        !matches!(self, ShutdownKind::Kill)
    }
}
