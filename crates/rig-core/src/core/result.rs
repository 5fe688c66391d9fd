// crates/rig-core/src/core/result.rs
// ============================================================================
// Module: Rig Harness Results
// Description: Scenario, session, and dispatch result records.
// Purpose: Capture one result per test case with full failure provenance.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Result records distinguish assertion failures from infrastructure
//! failures. Exactly one [`ScenarioResult`] exists per scenario; teardown is
//! always attempted and its failures are recorded rather than silently
//! dropped. Exit status mapping follows the pytest convention consumed by the
//! CI aggregator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AgentId;
use crate::core::identifiers::ScenarioId;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TargetId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Scenario Results
// ============================================================================

/// Scenario lifecycle phase.
///
/// # Invariants
/// - Ordering is fixed: setup strictly precedes execution strictly precedes
///   teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Precondition actions.
    Setup,
    /// Test actions.
    Execution,
    /// Cleanup actions; always attempted.
    Teardown,
}

/// One recorded action failure within a scenario phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    /// Phase the action ran in.
    pub phase: Phase,
    /// Action name.
    pub action: String,
    /// Failure message.
    pub message: String,
    /// Whether the failure was terminal for its phase.
    pub terminal: bool,
}

/// Final status of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// All setup and execution actions passed.
    Passed,
    /// At least one action failed; failures are recorded.
    Failed,
    /// Scenario was gated off and did not run.
    Skipped,
}

/// Result record for one scenario.
///
/// # Invariants
/// - Exactly one result exists per scenario per session.
/// - Teardown failures are present in `failures`; they never vanish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario identifier.
    pub scenario_id: ScenarioId,
    /// Final status.
    pub status: ScenarioStatus,
    /// Recorded failures across all phases.
    pub failures: Vec<ActionFailure>,
    /// Skip reason when the scenario was gated off.
    pub skip_reason: Option<String>,
    /// Tail of the scenario's log output.
    pub log_tail: Vec<String>,
    /// Timestamp when the scenario started.
    pub started: Timestamp,
    /// Timestamp when the scenario finished.
    pub finished: Timestamp,
}

impl ScenarioResult {
    /// Returns whether any recorded failure was terminal.
    #[must_use]
    pub fn has_terminal_failure(&self) -> bool {
        self.failures.iter().any(|failure| failure.terminal)
    }
}

// ============================================================================
// SECTION: Session Report
// ============================================================================

/// Aggregated result of one test session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier.
    pub session_id: SessionId,
    /// Scenario results in execution order.
    pub results: Vec<ScenarioResult>,
    /// Whether the session collected zero scenarios after name filtering.
    pub no_tests_collected: bool,
}

impl SessionReport {
    /// Counts results with the given status.
    #[must_use]
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|result| result.status == status).count()
    }

    /// Returns the exit status for the session per the pytest convention.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        if self.no_tests_collected {
            return ExitStatus::NoTestsCollected;
        }
        if self.count(ScenarioStatus::Failed) > 0 {
            return ExitStatus::TestsFailed;
        }
        ExitStatus::AllPassed
    }
}

/// Process exit status mapping consumed by the CI aggregator.
///
/// # Invariants
/// - Codes follow the pytest convention: 0 all passed, 1 failures, 2 usage
///   error, 5 no tests collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    /// Every collected scenario passed or was skipped.
    AllPassed,
    /// At least one scenario failed.
    TestsFailed,
    /// Invalid invocation or configuration.
    UsageError,
    /// No scenarios were collected.
    NoTestsCollected,
}

impl ExitStatus {
    /// Returns the numeric exit code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::AllPassed => 0,
            Self::TestsFailed => 1,
            Self::UsageError => 2,
            Self::NoTestsCollected => 5,
        }
    }
}

// ============================================================================
// SECTION: Dispatch Reports
// ============================================================================

/// Dispatch stage at which an infrastructure failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStage {
    /// Source checkout into the target workdir.
    Checkout,
    /// Container start / test command execution.
    Start,
    /// Result file collection.
    Collect,
    /// Environment release.
    Release,
}

/// Outcome of one run target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// Test command ran to completion; `exit_code` follows the pytest
    /// convention and is not an infrastructure failure.
    Completed {
        /// Exit code of the test command.
        exit_code: i32,
    },
    /// Infrastructure failure: the environment or agent was unusable.
    Infrastructure {
        /// Stage at which the failure occurred.
        stage: TargetStage,
        /// Failure message.
        message: String,
    },
    /// Target was terminated by the global dispatch timeout.
    TimedOut,
}

/// Per-target dispatch record.
///
/// # Invariants
/// - `released` reflects that environment release was invoked exactly once,
///   regardless of the run outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Target identifier.
    pub target_id: TargetId,
    /// Agent the target ran on.
    pub agent_id: AgentId,
    /// Run outcome.
    pub outcome: TargetOutcome,
    /// Whether environment release succeeded.
    pub released: bool,
    /// Whether the result file was collected.
    pub result_collected: bool,
}

/// Aggregated dispatch report across all run targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Per-target reports in completion order.
    pub targets: Vec<TargetReport>,
    /// Whether the global dispatch timeout fired.
    pub timed_out: bool,
}

impl DispatchReport {
    /// Returns whether the dispatch completed without infrastructure failures
    /// or test failures. Zero targets is a successful no-op.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.timed_out
            && self.targets.iter().all(|target| {
                matches!(
                    target.outcome,
                    TargetOutcome::Completed {
                        exit_code: 0,
                    }
                )
            })
    }

    /// Returns whether any target reported an infrastructure failure.
    #[must_use]
    pub fn has_infrastructure_failures(&self) -> bool {
        self.timed_out
            || self.targets.iter().any(|target| {
                matches!(
                    target.outcome,
                    TargetOutcome::Infrastructure { .. } | TargetOutcome::TimedOut
                )
            })
    }
}
