//! Lifecycle tests against real `sh` children.

use std::time::Duration;

use tokio::sync::mpsc;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use pgo_exec::{ExecError, host_signals, spawn, supervise};
use pgo_model::{ShutdownKind, WorkerSpec};

fn sh(script: &str) -> WorkerSpec {
    WorkerSpec::new("sh").with_args(["-c", script])
}

#[tokio::test]
async fn missing_binary_is_a_launch_error() {
    let spec = WorkerSpec::new("/no/such/worker-binary");
    match spawn(&spec) {
        Err(err) => assert!(err.is_launch(), "expected launch error, got: {err}"),
        Ok(_) => panic!("spawn of a missing binary succeeded"),
    }
}

#[tokio::test]
async fn natural_exit_code_is_observed() {
    let mut child = spawn(&sh("exit 7")).expect("spawn");
    let (_tx, mut rx) = mpsc::channel(1);

    let outcome = supervise(&mut child, &mut rx, None).await.expect("supervise");
    assert_eq!(outcome.code, Some(7));
    assert!(outcome.requested.is_none());
    // The launch instant survives the wait, so run time is measurable.
    assert!(child.started_at().elapsed() < Duration::from_secs(60));
}

#[tokio::test]
async fn clean_exit_with_closed_signal_source() {
    let mut child = spawn(&sh("exit 0")).expect("spawn");
    let (tx, mut rx) = mpsc::channel::<ShutdownKind>(1);
    drop(tx);

    let outcome = supervise(&mut child, &mut rx, None).await.expect("supervise");
    assert_eq!(outcome.code, Some(0));
}

#[tokio::test]
async fn forwarded_terminate_reaches_the_child_trap() {
    // The child converts SIGTERM into a clean exit, mimicking a worker that
    // flushes its profile buffers on terminate.
    let mut child = spawn(&sh(
        r#"trap 'exit 0' TERM INT; while :; do sleep 0.05; done"#,
    ))
    .expect("spawn");
    let (tx, mut rx) = mpsc::channel(4);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let _ = tx.send(ShutdownKind::Terminate).await;
        // A repeat while shutdown is in progress must be swallowed.
        let _ = tx.send(ShutdownKind::Terminate).await;
    });

    let outcome = supervise(&mut child, &mut rx, Some(Duration::from_secs(5)))
        .await
        .expect("supervise");
    assert_eq!(outcome.code, Some(0));
    assert_eq!(outcome.requested, Some(ShutdownKind::Terminate));
}

#[tokio::test]
async fn grace_expiry_escalates_to_kill() {
    // The child ignores SIGTERM entirely; only the escalation can stop it.
    let mut child = spawn(&sh(r#"trap '' TERM; while :; do sleep 0.05; done"#)).expect("spawn");
    let (tx, mut rx) = mpsc::channel(1);
    tx.send(ShutdownKind::Terminate).await.expect("send");

    let outcome = supervise(&mut child, &mut rx, Some(Duration::from_millis(300)))
        .await
        .expect("supervise");
    // Killed by signal: no exit code.
    assert_eq!(outcome.code, None);
    assert_eq!(outcome.requested, Some(ShutdownKind::Terminate));
}

#[tokio::test]
async fn real_sigterm_arrives_as_terminate_event() {
    // Exercises the host signal boundary itself: once the handlers are
    // installed, a SIGTERM delivered to this very process must surface as a
    // Terminate event instead of killing us.
    let mut signals = host_signals().expect("install handlers");
    kill(Pid::this(), Signal::SIGTERM).expect("deliver SIGTERM");

    let kind = tokio::time::timeout(Duration::from_secs(5), signals.recv())
        .await
        .expect("signal must arrive promptly")
        .expect("bridge task alive");
    assert_eq!(kind, ShutdownKind::Terminate);
}

#[tokio::test]
async fn signal_to_reaped_child_is_a_no_op() {
    let mut child = spawn(&sh("exit 0")).expect("spawn");
    let (_tx, mut rx) = mpsc::channel(1);
    let _ = supervise(&mut child, &mut rx, None).await.expect("supervise");

    // The pid is gone after reaping; delivery must not error.
    assert!(child.pid().is_none());
    assert!(child.signal(ShutdownKind::Terminate).is_ok());
}

#[tokio::test]
async fn wait_error_variant_formats_with_context() {
    let err = ExecError::Launch {
        program: "/opt/worker".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    let msg = err.to_string();
    assert!(msg.contains("/opt/worker"), "message was: {msg}");
}
