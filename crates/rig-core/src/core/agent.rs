// crates/rig-core/src/core/agent.rs
// ============================================================================
// Module: Rig Harness Agents
// Description: Execution agent descriptions used for node selection.
// Purpose: Represent the injected agent inventory without orchestrator coupling.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Agents are the execution targets of a dispatch run. The inventory is
//! injected explicitly (typically from configuration) rather than discovered
//! from a live orchestrator's internal object graph, so selection stays
//! deterministic and replayable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AgentId;

// ============================================================================
// SECTION: Agent
// ============================================================================

/// One execution agent and the labels it satisfies.
///
/// # Invariants
/// - Agents are ephemeral: the inventory is rebuilt per dispatch run and
///   never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Agent identifier (the agent's self label).
    pub agent_id: AgentId,
    /// Labels the agent satisfies.
    pub labels: Vec<String>,
}

impl Agent {
    /// Creates an agent with the provided identifier and labels.
    #[must_use]
    pub fn new(agent_id: impl Into<AgentId>, labels: Vec<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            labels,
        }
    }

    /// Returns whether the agent satisfies the given label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|candidate| candidate == label)
    }
}
