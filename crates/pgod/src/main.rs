//! PGO run supervisor: launches the instrumented prover worker, relays
//! termination signals to it, and uploads the profiling artifacts it leaves
//! behind before exiting.

use tracing::{error, info};

use pgo_core::Config;
use pgo_model::exit;
use pgo_observe::{LoggerConfig, logger_init};
use pgo_upload::S3Store;

#[tokio::main]
async fn main() {
    std::process::exit(supervise().await);
}

async fn supervise() -> i32 {
    // Everything after the supervisor's own name belongs to the worker.
    let worker_args: Vec<String> = std::env::args().skip(1).collect();

    let cfg = match Config::from_env(worker_args) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logger is not up yet.
            eprintln!("pgod: {e}");
            return exit::LAUNCH_FAILED;
        }
    };

    let format = match cfg.log_format.parse() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("pgod: {e}");
            return exit::LAUNCH_FAILED;
        }
    };
    let logger = LoggerConfig {
        format,
        level: cfg.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = logger_init(&logger) {
        eprintln!("pgod: {e}");
        return exit::LAUNCH_FAILED;
    }

    info!(
        target: "pgod",
        worker = %cfg.worker.program.display(),
        profile_dir = %cfg.profile_dir.display(),
        bucket = %cfg.bucket,
        grace = ?cfg.grace,
        "supervisor starting"
    );

    // Handlers go in before the worker exists, so a signal racing the spawn
    // is queued instead of killing the supervisor outright.
    let mut signals = match pgo_exec::host_signals() {
        Ok(rx) => rx,
        Err(e) => {
            error!(target: "pgod", error = %e, "failed to install signal handlers");
            return exit::LAUNCH_FAILED;
        }
    };

    let store = S3Store::connect(&cfg.bucket).await;

    match pgo_core::run(&cfg, &store, &mut signals).await {
        Ok(summary) => {
            info!(
                target: "pgod",
                code = summary.exit_code,
                uploaded = summary.report.uploaded.len(),
                failed = summary.report.failed.len(),
                "supervisor done"
            );
            summary.exit_code
        }
        Err(e) if e.is_launch() => {
            error!(target: "pgod", error = %e, "worker launch failed; nothing to upload");
            exit::LAUNCH_FAILED
        }
        Err(e) => {
            error!(target: "pgod", error = %e, "worker lifecycle failed after launch");
            exit::CHILD_FAILED
        }
    }
}
