// crates/rig-core/tests/report.rs
// ============================================================================
// Module: Report Builder Tests
// Description: Tests for JUnit and summary artifact generation.
// ============================================================================
//! ## Overview
//! Validates status mapping (failure vs error vs skipped), the fixed artifact
//! path, exit-code mapping, and the summary table.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use rig_core::ActionFailure;
use rig_core::ExitStatus;
use rig_core::Phase;
use rig_core::ScenarioId;
use rig_core::ScenarioResult;
use rig_core::ScenarioStatus;
use rig_core::SessionId;
use rig_core::SessionReport;
use rig_core::Timestamp;
use rig_core::runtime::JUNIT_RESULT_RELATIVE_PATH;
use rig_core::runtime::junit_report;
use rig_core::runtime::rst_summary;
use rig_core::runtime::write_junit;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a scenario result with the given status.
fn result(id: &str, status: ScenarioStatus) -> ScenarioResult {
    ScenarioResult {
        scenario_id: ScenarioId::new(id),
        status,
        failures: Vec::new(),
        skip_reason: None,
        log_tail: Vec::new(),
        started: Timestamp::UnixMillis(1_000),
        finished: Timestamp::UnixMillis(3_500),
    }
}

/// Builds a session report over the given results.
fn session(results: Vec<ScenarioResult>) -> SessionReport {
    SessionReport {
        session_id: SessionId::new("robot-2"),
        results,
        no_tests_collected: false,
    }
}

// ============================================================================
// SECTION: Status Mapping
// ============================================================================

#[test]
fn test_passed_failed_skipped_mapping() {
    let mut failed = result("offset-detection", ScenarioStatus::Failed);
    failed.failures.push(ActionFailure {
        phase: Phase::Execution,
        action: "measure".to_string(),
        message: "offset error above 7 electric degrees".to_string(),
        terminal: false,
    });
    let mut skipped = result("gpio-output", ScenarioStatus::Skipped);
    skipped.skip_reason = Some("need at least one device on the network".to_string());

    let report = session(vec![result("smoke", ScenarioStatus::Passed), failed, skipped]);
    let xml = junit_report(&report).to_string().unwrap();

    assert!(xml.contains("offset-detection"));
    assert!(xml.contains("<failure"));
    assert!(xml.contains("<skipped"));
    assert!(xml.contains("need at least one device on the network"));
}

#[test]
fn test_terminal_failures_map_to_error_entries() {
    let mut failed = result("link-check", ScenarioStatus::Failed);
    failed.failures.push(ActionFailure {
        phase: Phase::Setup,
        action: "verify_link".to_string(),
        message: "device disconnected".to_string(),
        terminal: true,
    });

    let xml = junit_report(&session(vec![failed])).to_string().unwrap();

    // Infrastructure/terminal failures are distinguishable from assertion
    // failures in the artifact.
    assert!(xml.contains("<error"));
    assert!(!xml.contains("<failure"));
}

#[test]
fn test_log_tail_lands_in_system_out() {
    let mut passed = result("smoke", ScenarioStatus::Passed);
    passed.log_tail = vec!["ran warmup".to_string(), "ran measure".to_string()];

    let xml = junit_report(&session(vec![passed])).to_string().unwrap();

    assert!(xml.contains("system-out"));
    assert!(xml.contains("ran measure"));
}

// ============================================================================
// SECTION: Artifact Path
// ============================================================================

#[test]
fn test_junit_artifact_lands_at_fixed_relative_path() {
    let root = tempfile::tempdir().unwrap();
    let report = session(vec![result("smoke", ScenarioStatus::Passed)]);

    let path = write_junit(&report, root.path()).unwrap();

    assert_eq!(path, root.path().join(JUNIT_RESULT_RELATIVE_PATH));
    assert!(path.is_file());
}

#[test]
fn test_report_is_written_even_with_failures() {
    let root = tempfile::tempdir().unwrap();
    let mut failed = result("bad", ScenarioStatus::Failed);
    failed.failures.push(ActionFailure {
        phase: Phase::Execution,
        action: "measure".to_string(),
        message: "tolerance".to_string(),
        terminal: false,
    });

    let path = write_junit(&session(vec![failed]), root.path()).unwrap();

    assert!(path.is_file());
}

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

#[test]
fn test_exit_code_mapping_follows_pytest_convention() {
    assert_eq!(ExitStatus::AllPassed.code(), 0);
    assert_eq!(ExitStatus::TestsFailed.code(), 1);
    assert_eq!(ExitStatus::UsageError.code(), 2);
    assert_eq!(ExitStatus::NoTestsCollected.code(), 5);
}

#[test]
fn test_skips_do_not_fail_the_session() {
    let report = session(vec![
        result("smoke", ScenarioStatus::Passed),
        result("gated", ScenarioStatus::Skipped),
    ]);
    assert_eq!(report.exit_status(), ExitStatus::AllPassed);
}

#[test]
fn test_any_failure_fails_the_session() {
    let report = session(vec![
        result("smoke", ScenarioStatus::Passed),
        result("bad", ScenarioStatus::Failed),
    ]);
    assert_eq!(report.exit_status(), ExitStatus::TestsFailed);
}

// ============================================================================
// SECTION: Summary
// ============================================================================

#[test]
fn test_summary_lists_every_scenario_with_its_result() {
    let report = session(vec![
        result("smoke", ScenarioStatus::Passed),
        result("bad", ScenarioStatus::Failed),
        result("gated", ScenarioStatus::Skipped),
    ]);

    let summary = rst_summary(&report);

    assert!(summary.contains("Test Report Summary"));
    assert!(summary.contains("smoke"));
    assert!(summary.contains("PASS"));
    assert!(summary.contains("FAIL"));
    assert!(summary.contains("SKIP"));
}
