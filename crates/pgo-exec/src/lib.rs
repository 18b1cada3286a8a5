mod error;
pub use error::ExecError;

mod proc;
pub use proc::{ChildHandle, spawn};

mod relay;
pub use relay::{RelayState, host_signals, supervise};
