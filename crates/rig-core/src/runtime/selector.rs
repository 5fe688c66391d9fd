// crates/rig-core/src/runtime/selector.rs
// ============================================================================
// Module: Rig Harness Node Selector
// Description: Label-based agent selection.
// Purpose: Resolve a label into the set of matching execution agents.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The node selector is the leaf of the dispatch pipeline: given a label, it
//! returns the agents whose label set contains that label. An empty result is
//! valid and means the dispatch loop performs zero iterations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Agent;
use crate::core::AgentId;

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Returns the identifiers of agents satisfying `label`, sorted by agent id.
///
/// The sort makes selection deterministic for a fixed agent inventory; no
/// other ordering is guaranteed. Zero matches is a valid result.
#[must_use]
pub fn select_agents(agents: &[Agent], label: &str) -> Vec<AgentId> {
    let mut selected: Vec<AgentId> = agents
        .iter()
        .filter(|agent| agent.has_label(label))
        .map(|agent| agent.agent_id.clone())
        .collect();
    selected.sort();
    selected
}
