//! End-to-end scenarios for group execution.
//!
//! Exercises `GroupExecutor` through its public seam with a fake resource
//! manager and a fake notification sink, but a real `IntegrityStore` and
//! `SecurityPolicy` backed by a temp-file fixture — file verification and
//! redaction are load-bearing behaviors, not things worth faking away.

use rcr_core::test_support::{command, group};
use rcr_core::{CommandResult, GlobalSpec};
use rcr_engine::{ExecuteOptions, ExecutorConfig, GroupExecutor};
use rcr_exec::{FakeOutcome, FakeResourceManager};
use rcr_notify::FakeNotifySink;
use rcr_security::SecurityPolicy;
use rcr_verify::{hash_file, IntegrityStore};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Fixture {
    _dir: tempfile::TempDir,
    store: Arc<IntegrityStore>,
}

impl Fixture {
    /// Write an (unused — the fake manager intercepts execution) executable
    /// stand-in for `name` and register it in the integrity manifest.
    fn with_binaries(names: &[&str]) -> (Self, Vec<(String, PathBuf)>) {
        let dir = tempfile::tempdir().unwrap();
        let manifest_dir = dir.path().join("manifests");
        std::fs::create_dir_all(&manifest_dir).unwrap();

        let mut paths = Vec::new();
        let mut manifest = String::new();
        for name in names {
            let bin = dir.path().join(name);
            std::fs::write(&bin, b"#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
            let digest = hash_file(&bin).unwrap();
            manifest.push_str(&format!("{digest}  {}\n", bin.display()));
            paths.push((name.to_string(), bin));
        }
        std::fs::write(manifest_dir.join("bins.sha256"), manifest).unwrap();

        let store = Arc::new(IntegrityStore::scan_dir(&manifest_dir).unwrap());
        (Self { _dir: dir, store }, paths)
    }
}

fn executor(manager: Arc<FakeResourceManager>, store: Arc<IntegrityStore>) -> (GroupExecutor, Arc<FakeNotifySink>) {
    let notifier = Arc::new(FakeNotifySink::new());
    let policy = Arc::new(SecurityPolicy::default());
    let exec = GroupExecutor::new(manager, notifier.clone(), store, policy, "", ExecutorConfig::default());
    (exec, notifier)
}

#[tokio::test]
async fn s1_single_command_succeeds() {
    let (fixture, bins) = Fixture::with_binaries(&["echo"]);
    let manager = Arc::new(FakeResourceManager::new());
    manager.set_outcome(
        "echo",
        FakeOutcome::Result(CommandResult {
            exit_code: 0,
            stdout: "hi".to_string(),
            stderr: String::new(),
        }),
    );
    let (exec, notifier) = executor(manager, fixture.store.clone());

    let g = group("g", vec![command("echo", &bins[0].1.display().to_string(), &[])]);

    let result = exec
        .execute_group(&GlobalSpec::default(), &g, CancellationToken::new(), ExecuteOptions::default())
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.last_command, "echo");
    assert_eq!(result.commands[0].output, "hi");
    assert_eq!(notifier.calls().len(), 1);
}

#[tokio::test]
async fn s2_stops_on_first_failure() {
    let (fixture, bins) = Fixture::with_binaries(&["true", "false", "echo"]);
    let manager = Arc::new(FakeResourceManager::new());
    manager.set_outcome(
        "true",
        FakeOutcome::Result(CommandResult { exit_code: 0, stdout: String::new(), stderr: String::new() }),
    );
    manager.set_outcome(
        "false",
        FakeOutcome::Result(CommandResult { exit_code: 1, stdout: String::new(), stderr: String::new() }),
    );
    let (exec, _notifier) = executor(manager.clone(), fixture.store.clone());

    let mut g = group(
        "g",
        vec![
            command("true", "", &[]),
            command("false", "", &[]),
            command("echo", "", &[]),
        ],
    );
    for (spec, (_, path)) in g.commands.iter_mut().zip(&bins) {
        spec.cmd = path.display().to_string();
    }

    let err = exec
        .execute_group(&GlobalSpec::default(), &g, CancellationToken::new(), ExecuteOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        rcr_core::RunnerError::Execution(rcr_core::ExecutionError::CommandFailed { exit_code: 1, .. })
    ));
    let calls = manager.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].name, "false");
}

#[tokio::test]
async fn s3_work_dir_template_is_expanded_from_a_group_variable() {
    let (fixture, bins) = Fixture::with_binaries(&["echo"]);
    let manager = Arc::new(FakeResourceManager::new());
    let (exec, _notifier) = executor(manager.clone(), fixture.store.clone());

    let mut g = group("g", vec![command("echo", &bins[0].1.display().to_string(), &[])]);
    g.vars.insert("project".to_string(), "app".to_string());
    g.work_dir = Some("/tmp/%{project}".to_string());

    let result = exec
        .execute_group(&GlobalSpec::default(), &g, CancellationToken::new(), ExecuteOptions::default())
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(manager.calls()[0].cwd, Path::new("/tmp/app"));
}

#[tokio::test]
async fn s4_undefined_work_dir_variable_aborts_before_any_command_runs() {
    let (fixture, bins) = Fixture::with_binaries(&["echo"]);
    let manager = Arc::new(FakeResourceManager::new());
    let (exec, notifier) = executor(manager.clone(), fixture.store.clone());

    let mut g = group("g", vec![command("echo", &bins[0].1.display().to_string(), &[])]);
    g.work_dir = Some("/tmp/%{missing}".to_string());

    let err = exec
        .execute_group(&GlobalSpec::default(), &g, CancellationToken::new(), ExecuteOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        rcr_core::RunnerError::Resolution(rcr_core::ResolutionError::WorkDirExpansion { .. })
    ));
    assert!(err.to_string().contains("missing"));
    assert_eq!(manager.calls().len(), 0);
    assert_eq!(notifier.calls().len(), 1);
}

#[tokio::test]
async fn s5_deadline_exceeded_reports_the_timeout() {
    let (fixture, bins) = Fixture::with_binaries(&["slow"]);
    let manager = Arc::new(FakeResourceManager::new());
    manager.set_outcome("slow", FakeOutcome::Hang(Duration::from_secs(5)));
    let (exec, _notifier) = executor(manager.clone(), fixture.store.clone());

    let mut g = group("g", vec![command("slow", &bins[0].1.display().to_string(), &[])]);
    g.commands[0].timeout = Some(1);

    let err = exec
        .execute_group(&GlobalSpec::default(), &g, CancellationToken::new(), ExecuteOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        rcr_core::RunnerError::Execution(rcr_core::ExecutionError::DeadlineExceeded { .. })
    ));
}

#[tokio::test]
async fn s6_stderr_is_redacted_in_the_notification_payload() {
    let (fixture, bins) = Fixture::with_binaries(&["leaky"]);
    let manager = Arc::new(FakeResourceManager::new());
    manager.set_outcome(
        "leaky",
        FakeOutcome::Result(CommandResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: "auth failed: token=abc123xyz".to_string(),
        }),
    );
    let (exec, notifier) = executor(manager, fixture.store.clone());

    let g = group("g", vec![command("leaky", &bins[0].1.display().to_string(), &[])]);

    let result = exec
        .execute_group(&GlobalSpec::default(), &g, CancellationToken::new(), ExecuteOptions::default())
        .await
        .unwrap();

    assert!(result.commands[0].stderr.contains("[REDACTED]"));
    assert!(!result.commands[0].stderr.contains("abc123xyz"));

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
}

#[tokio::test]
async fn s7_validate_group_resolves_without_executing_anything() {
    let (fixture, bins) = Fixture::with_binaries(&["echo"]);
    let manager = Arc::new(FakeResourceManager::new());
    let (exec, _notifier) = executor(manager.clone(), fixture.store.clone());

    let g = group("g", vec![command("echo", &bins[0].1.display().to_string(), &["hi"])]);

    let report = exec
        .validate_group(&GlobalSpec::default(), &g)
        .await
        .unwrap();

    assert_eq!(report.group, "g");
    assert_eq!(report.commands.len(), 1);
    assert_eq!(report.commands[0].name, "echo");
    assert!(manager.calls().is_empty());
}
