//! Process exit-code scheme for the supervisor.
//!
//! The two failure categories that can coexist — worker failure and upload
//! failure — occupy separate bits so operators can tell "worker failed" from
//! "worker succeeded but telemetry was lost" from the code alone.

/// Worker exited cleanly and every artifact uploaded.
pub const OK: i32 = 0;
/// The worker could not be started at all; no upload was attempted.
pub const LAUNCH_FAILED: i32 = 1;
/// The worker exited non-zero or died to a signal.
pub const CHILD_FAILED: i32 = 2;
/// At least one discovered artifact failed to upload.
pub const UPLOAD_FAILED: i32 = 4;

/// Combine the run outcome into the final process exit code.
pub fn code(child_clean: bool, uploads_ok: bool) -> i32 {
    let mut code = OK;
    if !child_clean {
        code |= CHILD_FAILED;
    }
    if !uploads_ok {
        code |= UPLOAD_FAILED;
    }
    code
}
