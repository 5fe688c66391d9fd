// system-tests/tests/dispatch_end_to_end.rs
// ============================================================================
// Module: Dispatch End-to-End Suite
// Description: Full-stack dispatch over local processes.
// Purpose: Exercise config, selection, planning, and parallel dispatch.
// Dependencies: rig-config, rig-core, rig-exec, system-tests helpers
// ============================================================================

//! ## Overview
//! Drives the whole dispatch pipeline: configuration, label selection, target
//! planning, parallel dispatch with local processes, and report aggregation.
//! Test commands are small shell scripts that write the result artifact the
//! way a real containerized session would.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rig_core::TargetOutcome;
use rig_core::runtime::TargetTemplate;
use rig_core::runtime::plan_targets;
use rig_core::runtime::select_agents;
use rig_exec::CopyCheckout;
use rig_exec::LocalEngine;
use rig_exec::ParallelDispatcher;
use system_tests::two_robot_config;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Shell command writing the JUnit artifact and exiting with `code`.
fn session_stub(code: i32) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("mkdir -p results && echo '<testsuites/>' > results/junit.xml && exit {code}"),
    ]
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_across_selected_agents() {
    let config = two_robot_config();
    let agents = config.agent_inventory();
    let selected = select_agents(&agents, "daq");
    assert_eq!(selected.len(), 2);

    let source = tempfile::tempdir().unwrap();
    fs::write(source.path().join("marker.txt"), "source").unwrap();
    let root = tempfile::tempdir().unwrap();

    let template = TargetTemplate {
        test_dir: config.runner.test_dir.clone(),
        command: session_stub(0),
        workdir_root: root.path().to_path_buf(),
        result_path: PathBuf::from(rig_core::JUNIT_RESULT_RELATIVE_PATH),
    };
    let targets = plan_targets(&selected, &template);

    let dispatcher = ParallelDispatcher::new(
        Arc::new(LocalEngine::new()),
        Arc::new(CopyCheckout::new(source.path())),
    )
    .with_timeout(Duration::from_secs(60));

    let report = dispatcher.dispatch_all(targets).await;

    assert!(report.is_success());
    assert_eq!(report.targets.len(), 2);
    for target in &report.targets {
        assert!(target.released);
        assert!(target.result_collected);
        // Each target produced its own artifact in its own workdir.
        let artifact = root
            .path()
            .join(target.agent_id.as_str())
            .join(rig_core::JUNIT_RESULT_RELATIVE_PATH);
        assert!(artifact.is_file());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unmatched_label_is_a_successful_noop() {
    let config = two_robot_config();
    let agents = config.agent_inventory();
    let selected = select_agents(&agents, "torque");
    assert!(selected.is_empty());

    let root = tempfile::tempdir().unwrap();
    let template = TargetTemplate {
        test_dir: config.runner.test_dir.clone(),
        command: session_stub(0),
        workdir_root: root.path().to_path_buf(),
        result_path: PathBuf::from(rig_core::JUNIT_RESULT_RELATIVE_PATH),
    };
    let targets = plan_targets(&selected, &template);

    let source = tempfile::tempdir().unwrap();
    let dispatcher = ParallelDispatcher::new(
        Arc::new(LocalEngine::new()),
        Arc::new(CopyCheckout::new(source.path())),
    );

    let report = dispatcher.dispatch_all(targets).await;

    assert!(report.is_success());
    assert!(report.targets.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failing_session_surfaces_as_test_failure() {
    let config = two_robot_config();
    let agents = config.agent_inventory();
    let selected = select_agents(&agents, "gpio");
    assert_eq!(selected.len(), 1);

    let source = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let template = TargetTemplate {
        test_dir: config.runner.test_dir.clone(),
        command: session_stub(1),
        workdir_root: root.path().to_path_buf(),
        result_path: PathBuf::from(rig_core::JUNIT_RESULT_RELATIVE_PATH),
    };
    let targets = plan_targets(&selected, &template);

    let dispatcher = ParallelDispatcher::new(
        Arc::new(LocalEngine::new()),
        Arc::new(CopyCheckout::new(source.path())),
    );

    let report = dispatcher.dispatch_all(targets).await;

    assert!(!report.is_success());
    assert!(!report.has_infrastructure_failures());
    assert_eq!(
        report.targets[0].outcome,
        TargetOutcome::Completed {
            exit_code: 1,
        }
    );
}
