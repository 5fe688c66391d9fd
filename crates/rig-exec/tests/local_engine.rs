// crates/rig-exec/tests/local_engine.rs
// ============================================================================
// Module: Local Engine Tests
// Description: Tests for the process-based engine.
// ============================================================================
//! ## Overview
//! Validates exit-code reporting, idempotent stop, and cooperative
//! termination of an in-flight run.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use rig_core::TargetId;
use rig_core::interfaces::ContainerEngine;
use rig_exec::LocalEngine;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a shell command.
fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

#[test]
fn test_exit_code_zero_is_reported() {
    let engine = LocalEngine::new();
    let workdir = tempfile::tempdir().unwrap();
    let code = engine.start(&sh("true"), workdir.path(), &TargetId::new("t-ok")).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_nonzero_exit_code_is_reported() {
    let engine = LocalEngine::new();
    let workdir = tempfile::tempdir().unwrap();
    let code = engine.start(&sh("exit 3"), workdir.path(), &TargetId::new("t-fail")).unwrap();
    assert_eq!(code, 3);
}

#[test]
fn test_empty_command_is_a_start_failure() {
    let engine = LocalEngine::new();
    let workdir = tempfile::tempdir().unwrap();
    assert!(engine.start(&[], workdir.path(), &TargetId::new("t-empty")).is_err());
}

// ============================================================================
// SECTION: Stop
// ============================================================================

#[test]
fn test_stop_is_idempotent_for_unknown_targets() {
    let engine = LocalEngine::new();
    engine.stop(&TargetId::new("never-started")).unwrap();
    engine.stop(&TargetId::new("never-started")).unwrap();
}

#[test]
fn test_stop_terminates_an_in_flight_run() {
    let engine = Arc::new(LocalEngine::new());
    let workdir = tempfile::tempdir().unwrap();
    let name = TargetId::new("t-long");

    let runner = {
        let engine = Arc::clone(&engine);
        let workdir = workdir.path().to_path_buf();
        let name = name.clone();
        thread::spawn(move || engine.start(&sh("sleep 30"), &workdir, &name))
    };

    // Give the child a moment to spawn, then request the stop.
    thread::sleep(Duration::from_millis(200));
    let stopped_at = Instant::now();
    engine.stop(&name).unwrap();

    let outcome = runner.join().unwrap();
    assert!(outcome.is_ok());
    assert!(stopped_at.elapsed() < Duration::from_secs(10));
}
