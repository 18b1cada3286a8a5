use serde::{Deserialize, Serialize};

use crate::ShutdownKind;

/// Observed terminal state of the worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildOutcome {
    /// Exit code reported by the OS; `None` if the worker died to a signal
    /// (including a grace-period SIGKILL escalation).
    pub code: Option<i32>,
    /// The shutdown the supervisor forwarded, if the run was externally
    /// terminated. `None` means the worker exited on its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<ShutdownKind>,
}

impl ChildOutcome {
    pub fn new(code: Option<i32>, requested: Option<ShutdownKind>) -> Self {
        Self { code, requested }
    }

    /// True if the worker exited with status zero.
    pub fn clean(&self) -> bool {
        self.code == Some(0)
    }

    /// True if the run ended because the host asked the supervisor to stop.
    pub fn externally_terminated(&self) -> bool {
        self.requested.is_some()
    }
}
