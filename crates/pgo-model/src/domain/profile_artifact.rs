use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A profiling data file discovered in the local artifact directory.
///
/// Artifacts are produced by the instrumented worker as a side effect of its
/// execution; the supervisor only ever reads them, never deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileArtifact {
    /// Absolute or directory-relative path on local disk.
    pub path: PathBuf,
    /// Bare file name, used as the final remote key segment.
    pub file_name: String,
    /// Size in bytes at discovery time.
    pub size: u64,
    /// Last modification time at discovery time.
    pub modified: SystemTime,
}
