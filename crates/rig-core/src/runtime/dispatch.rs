// crates/rig-core/src/runtime/dispatch.rs
// ============================================================================
// Module: Rig Harness Dispatch Loop
// Description: Per-target execution with guaranteed environment release.
// Purpose: Map run targets through checkout, execution, and collection.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! The dispatch loop is a map over run targets, not a pipeline with shared
//! state: one target's failure never blocks the others. For every target,
//! result collection and environment release sit in guaranteed-run positions
//! relative to the test invocation, and release is invoked exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use crate::core::AgentId;
use crate::core::DispatchReport;
use crate::core::RunTarget;
use crate::core::TargetId;
use crate::core::TargetOutcome;
use crate::core::TargetReport;
use crate::core::TargetStage;
use crate::interfaces::ContainerEngine;
use crate::interfaces::SourceCheckout;

// ============================================================================
// SECTION: Target Planning
// ============================================================================

/// Template shared by every run target planned from one dispatch request.
#[derive(Debug, Clone)]
pub struct TargetTemplate {
    /// Test directory to execute.
    pub test_dir: PathBuf,
    /// Test command executed inside each environment.
    pub command: Vec<String>,
    /// Root under which each target gets its own workdir.
    pub workdir_root: PathBuf,
    /// Result file path relative to each workdir.
    pub result_path: PathBuf,
}

/// Plans one run target per selected agent.
///
/// Target identifiers are deterministic (`rig-<agent>`) and double as
/// container names; each target's workdir is a distinct directory under the
/// template's workdir root, so targets share no state.
#[must_use]
pub fn plan_targets(agents: &[AgentId], template: &TargetTemplate) -> Vec<RunTarget> {
    agents
        .iter()
        .map(|agent_id| RunTarget {
            target_id: TargetId::new(format!("rig-{agent_id}")),
            agent_id: agent_id.clone(),
            test_dir: template.test_dir.clone(),
            command: template.command.clone(),
            workdir: template.workdir_root.join(agent_id.as_str()),
            result_path: template.result_path.clone(),
        })
        .collect()
}

// ============================================================================
// SECTION: Per-Target Run
// ============================================================================

/// Runs one target: checkout, execute, collect, release.
///
/// Release is invoked exactly once whether checkout and execution succeeded,
/// failed, or returned an error; a release failure is logged and recorded,
/// never propagated.
pub fn run_target(
    engine: &dyn ContainerEngine,
    checkout: &dyn SourceCheckout,
    target: &RunTarget,
) -> TargetReport {
    tracing::debug!(target = %target.target_id, agent = %target.agent_id, "dispatching run target");

    let run = checkout
        .checkout(&target.workdir)
        .map_err(|err| (TargetStage::Checkout, err.to_string()))
        .and_then(|()| {
            engine
                .start(&target.command, &target.workdir, target.container_name())
                .map_err(|err| (TargetStage::Start, err.to_string()))
        });

    // Collection runs whether or not the test command succeeded.
    let result_collected = collect_result(&target.result_file());

    // Release runs unconditionally, exactly once.
    let released = match engine.stop(target.container_name()) {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(target = %target.target_id, error = %err, "environment release failed");
            false
        }
    };

    let outcome = match run {
        Ok(exit_code) if result_collected => TargetOutcome::Completed {
            exit_code,
        },
        Ok(exit_code) => TargetOutcome::Infrastructure {
            stage: TargetStage::Collect,
            message: format!("test command exited with code {exit_code} but produced no result file"),
        },
        Err((stage, message)) => {
            tracing::error!(target = %target.target_id, %message, "run target failed");
            TargetOutcome::Infrastructure {
                stage,
                message,
            }
        }
    };

    TargetReport {
        target_id: target.target_id.clone(),
        agent_id: target.agent_id.clone(),
        outcome,
        released,
        result_collected,
    }
}

/// Returns whether the target's result file exists.
fn collect_result(result_file: &Path) -> bool {
    result_file.is_file()
}

// ============================================================================
// SECTION: Sequential Dispatch
// ============================================================================

/// Runs every target in order, collecting one report per target.
///
/// Zero targets yields an empty, successful report: a no-op dispatch is not
/// an error.
#[must_use]
pub fn run_targets(
    engine: &dyn ContainerEngine,
    checkout: &dyn SourceCheckout,
    targets: &[RunTarget],
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for target in targets {
        report.targets.push(run_target(engine, checkout, target));
    }
    report
}
