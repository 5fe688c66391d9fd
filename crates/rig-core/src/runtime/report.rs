// crates/rig-core/src/runtime/report.rs
// ============================================================================
// Module: Rig Harness Report Builder
// Description: JUnit XML and summary artifact generation.
// Purpose: Aggregate scenario results into the artifacts the CI consumes.
// Dependencies: crate::core, quick-junit
// ============================================================================

//! ## Overview
//! Every session produces a JUnit-style XML artifact at a fixed relative
//! path, written whether or not scenarios failed. Assertion failures map to
//! `failure` entries and terminal/infrastructure failures to `error` entries,
//! so the aggregator can distinguish them while both yield non-zero exit
//! status. An optional reStructuredText summary table covers the acceptance
//! report workflow.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use quick_junit::NonSuccessKind;
use quick_junit::Report;
use quick_junit::TestCase;
use quick_junit::TestCaseStatus;
use quick_junit::TestSuite;
use quick_junit::XmlString;
use thiserror::Error;

use crate::core::Phase;
use crate::core::ScenarioResult;
use crate::core::ScenarioStatus;
use crate::core::SessionReport;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed relative path of the JUnit result artifact, consumed by the CI
/// aggregator.
pub const JUNIT_RESULT_RELATIVE_PATH: &str = "results/junit.xml";

/// Root report name embedded in the JUnit artifact.
const REPORT_NAME: &str = "rig-harness";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Report generation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// XML serialization failed.
    #[error("report serialization failed: {0}")]
    Serialize(String),
    /// Artifact could not be written.
    #[error("report io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: JUnit Generation
// ============================================================================

/// Builds the JUnit report for one session.
#[must_use]
pub fn junit_report(session: &SessionReport) -> Report {
    let mut report = Report::new(REPORT_NAME);
    let mut suite = TestSuite::new(session.session_id.as_str());
    for result in &session.results {
        suite.add_test_case(test_case(result));
    }
    report.add_test_suite(suite);
    report
}

/// Builds one JUnit test case from a scenario result.
fn test_case(result: &ScenarioResult) -> TestCase {
    let status = match result.status {
        ScenarioStatus::Passed => TestCaseStatus::success(),
        ScenarioStatus::Skipped => {
            let mut status = TestCaseStatus::skipped();
            if let TestCaseStatus::Skipped {
                message, ..
            } = &mut status
                && let Some(reason) = &result.skip_reason
            {
                *message = Some(XmlString::new(reason.as_str()));
            }
            status
        }
        ScenarioStatus::Failed => {
            // Terminal failures mean the environment was unusable; report
            // them as errors so the aggregator can tell them apart from
            // assertion failures.
            let kind = if result.has_terminal_failure() {
                NonSuccessKind::Error
            } else {
                NonSuccessKind::Failure
            };
            let mut status = TestCaseStatus::non_success(kind);
            if let TestCaseStatus::NonSuccess {
                message,
                description,
                ..
            } = &mut status
            {
                *message = result
                    .failures
                    .first()
                    .map(|failure| XmlString::new(failure.message.as_str()));
                *description = Some(XmlString::new(failure_description(result)));
            }
            status
        }
    };

    let mut case = TestCase::new(result.scenario_id.as_str(), status);
    if let Some(duration) = scenario_duration(result) {
        case.set_time(duration);
    }
    if !result.log_tail.is_empty() {
        case.set_system_out(result.log_tail.join("\n"));
    }
    case
}

/// Formats all recorded failures of a scenario, one per line.
fn failure_description(result: &ScenarioResult) -> String {
    let mut description = String::new();
    for failure in &result.failures {
        let phase = match failure.phase {
            Phase::Setup => "setup",
            Phase::Execution => "execution",
            Phase::Teardown => "teardown",
        };
        let marker = if failure.terminal { " (terminal)" } else { "" };
        let _ = writeln!(
            description,
            "[{phase}] {}: {}{marker}",
            failure.action, failure.message
        );
    }
    description
}

/// Computes the scenario duration when both timestamps carry wall-clock time.
fn scenario_duration(result: &ScenarioResult) -> Option<Duration> {
    match (result.started, result.finished) {
        (Timestamp::UnixMillis(started), Timestamp::UnixMillis(finished)) => {
            let millis = u64::try_from(finished.saturating_sub(started)).ok()?;
            Some(Duration::from_millis(millis))
        }
        _ => None,
    }
}

/// Writes the JUnit artifact under `root` at the fixed relative path.
///
/// # Errors
///
/// Returns [`ReportError`] when serialization or writing fails.
pub fn write_junit(session: &SessionReport, root: &Path) -> Result<PathBuf, ReportError> {
    let path = root.join(JUNIT_RESULT_RELATIVE_PATH);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| ReportError::Io(err.to_string()))?;
    }
    let xml = junit_report(session)
        .to_string()
        .map_err(|err| ReportError::Serialize(err.to_string()))?;
    fs::write(&path, xml).map_err(|err| ReportError::Io(err.to_string()))?;
    Ok(path)
}

// ============================================================================
// SECTION: Summary Artifact
// ============================================================================

/// Renders a reStructuredText summary table of scenario results.
#[must_use]
pub fn rst_summary(session: &SessionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Test Report Summary");
    let _ = writeln!(out, "===================");
    let _ = writeln!(out);
    let _ = writeln!(out, ".. list-table::");
    let _ = writeln!(out, "   :header-rows: 1");
    let _ = writeln!(out);
    let _ = writeln!(out, "   * - Test case");
    let _ = writeln!(out, "     - Result");
    for result in &session.results {
        let label = match result.status {
            ScenarioStatus::Passed => "PASS",
            ScenarioStatus::Failed => "FAIL",
            ScenarioStatus::Skipped => "SKIP",
        };
        let _ = writeln!(out, "   * - {}", result.scenario_id);
        let _ = writeln!(out, "     - {label}");
    }
    out
}

/// Writes the summary artifact to `path`.
///
/// # Errors
///
/// Returns [`ReportError::Io`] when writing fails.
pub fn write_summary(session: &SessionReport, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| ReportError::Io(err.to_string()))?;
    }
    fs::write(path, rst_summary(session)).map_err(|err| ReportError::Io(err.to_string()))
}
