// crates/rig-hw/src/psu.rs
// ============================================================================
// Module: Rig Hardware Power Supply
// Description: Simulated remote-controlled power supply.
// Purpose: Bracket sessions with idempotent power control.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! After power-on the chain needs time before every node is identified; the
//! settle budget scales with the expected node count. The simulated supply
//! tracks output state without sleeping so sessions and tests stay fast; a
//! real supply implementation would wait out [`SimulatedPsu::settle_budget`]
//! before returning from power-on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::time::Duration;

use rig_core::interfaces::PowerSupply;
use rig_core::interfaces::PsuError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Per-node identification budget after power-on, in seconds.
pub const SETTLE_SECS_PER_NODE: u64 = 8;

// ============================================================================
// SECTION: Simulated Supply
// ============================================================================

/// In-memory power supply with idempotent output control.
pub struct SimulatedPsu {
    /// Expected node count, used for the settle budget.
    node_count: u64,
    /// Current output state.
    on: Mutex<bool>,
}

impl SimulatedPsu {
    /// Creates a supply for a chain with the expected node count.
    #[must_use]
    pub fn new(node_count: u64) -> Self {
        Self {
            node_count,
            on: Mutex::new(false),
        }
    }

    /// Returns the settle budget after power-on.
    #[must_use]
    pub const fn settle_budget(&self) -> Duration {
        Duration::from_secs(self.node_count.saturating_mul(SETTLE_SECS_PER_NODE))
    }

    /// Returns whether the output is currently on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.lock().map(|on| *on).unwrap_or(false)
    }
}

impl PowerSupply for SimulatedPsu {
    fn power_on(&self) -> Result<(), PsuError> {
        let mut on = self.on.lock().map_err(|_| PsuError::Control("state poisoned".to_string()))?;
        if !*on {
            tracing::info!(settle_secs = self.settle_budget().as_secs(), "output on");
            *on = true;
        }
        Ok(())
    }

    fn power_off(&self) -> Result<(), PsuError> {
        let mut on = self.on.lock().map_err(|_| PsuError::Control("state poisoned".to_string()))?;
        if *on {
            tracing::info!("output off");
            *on = false;
        }
        Ok(())
    }
}
