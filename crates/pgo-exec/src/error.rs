use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to launch worker {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for worker exit: {0}")]
    Wait(#[source] std::io::Error),
    #[error("failed to deliver {signal} to worker pid {pid}: {source}")]
    Signal {
        signal: &'static str,
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// True if the worker never started; the supervisor must exit without
    /// attempting any upload in that case.
    pub fn is_launch(&self) -> bool {
        matches!(self, ExecError::Launch { .. })
    }
}
