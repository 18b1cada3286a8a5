use tokio::sync::mpsc;
use tracing::{error, info};

use pgo_exec::ExecError;
use pgo_model::{ChildOutcome, ShutdownKind, UploadReport, exit};
use pgo_upload::{ArtifactStore, RunScope, upload_all};

use crate::config::Config;

/// Everything one supervised run produced, already reduced to the process
/// exit code the binary should report.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: ChildOutcome,
    pub report: UploadReport,
    pub exit_code: i32,
}

/// Execute one full supervision cycle: launch the worker, relay shutdown
/// signals, and upload whatever profiling artifacts exist once the child is
/// confirmed dead.
///
/// Only a launch failure propagates as `Err` — there can be no artifacts
/// yet, so no upload is attempted. Everything after a successful launch,
/// including a relay error, still reaches the upload phase: the profiles of
/// a failed run matter most.
pub async fn run<S>(
    cfg: &Config,
    store: &S,
    signals: &mut mpsc::Receiver<ShutdownKind>,
) -> Result<RunSummary, ExecError>
where
    S: ArtifactStore + ?Sized,
{
    let mut child = pgo_exec::spawn(&cfg.worker)?;
    info!(
        target: "pgod",
        pid = child.pid(),
        program = child.program(),
        "worker launched"
    );

    let outcome = match pgo_exec::supervise(&mut child, signals, cfg.grace).await {
        Ok(outcome) => outcome,
        Err(e) => {
            // The worker did launch, so this is not a launch failure: record
            // the run as failed and salvage whatever artifacts exist. The
            // kill below also reaps, keeping the child-dead-before-upload
            // invariant intact.
            error!(target: "pgod", error = %e, "relay failed after launch; treating worker as failed");
            child.force_kill().await;
            ChildOutcome::new(None, None)
        }
    };

    // The child is reaped; the artifact directory is now exclusively ours.
    info!(
        target: "pgod",
        run_time_secs = child.started_at().elapsed().as_secs_f64(),
        code = outcome.code,
        "worker run finished"
    );

    let scope = RunScope::new(cfg.prefix_for(&outcome));
    let report = match pgo_upload::scan_profiles(&cfg.profile_dir, &cfg.profile_ext).await {
        Ok(artifacts) => {
            info!(
                target: "pgod",
                run_id = scope.run_id(),
                found = artifacts.len(),
                "uploading profiling artifacts"
            );
            upload_all(store, &scope, &artifacts).await
        }
        Err(e) => {
            // Scan failure means artifacts may exist but cannot be listed;
            // surface it as a failed (empty) upload pass.
            error!(target: "pgod", error = %e, "artifact scan failed");
            let mut report = UploadReport::new(0);
            report.record_failure(cfg.profile_dir.display().to_string(), e.to_string());
            report
        }
    };

    match serde_json::to_string(&report) {
        Ok(summary) => info!(target: "pgod", report = %summary, "upload summary"),
        Err(e) => error!(target: "pgod", error = %e, "upload summary serialization failed"),
    }

    let exit_code = exit::code(outcome.clean(), report.all_ok());
    Ok(RunSummary {
        outcome,
        report,
        exit_code,
    })
}
