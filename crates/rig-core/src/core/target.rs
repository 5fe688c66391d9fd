// crates/rig-core/src/core/target.rs
// ============================================================================
// Module: Rig Harness Run Targets
// Description: Per-dispatch run target descriptions.
// Purpose: Pair an agent with a test directory and an isolated environment.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A run target is one (agent, test directory) pair to execute. Each target
//! exclusively owns its container name, working directory, and result file
//! path for its lifetime; nothing is shared between targets.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AgentId;
use crate::core::identifiers::TargetId;

// ============================================================================
// SECTION: Run Target
// ============================================================================

/// One (agent, test directory) pair to execute in an isolated environment.
///
/// # Invariants
/// - `target_id` doubles as the container name and is unique per dispatch run.
/// - `result_path` is relative to `workdir` and owned exclusively by this target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTarget {
    /// Target identifier, also used as the container name.
    pub target_id: TargetId,
    /// Agent the target runs on.
    pub agent_id: AgentId,
    /// Test directory selected for this target.
    pub test_dir: PathBuf,
    /// Test command executed inside the environment.
    pub command: Vec<String>,
    /// Working directory that receives the source checkout.
    pub workdir: PathBuf,
    /// Result file path relative to `workdir`.
    pub result_path: PathBuf,
}

impl RunTarget {
    /// Returns the container name owned by this target.
    #[must_use]
    pub const fn container_name(&self) -> &TargetId {
        &self.target_id
    }

    /// Returns the absolute path of the target's result file.
    #[must_use]
    pub fn result_file(&self) -> PathBuf {
        self.workdir.join(&self.result_path)
    }
}
