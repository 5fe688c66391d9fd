// crates/rig-hw/tests/psu.rs
// ============================================================================
// Module: Power Supply Tests
// Description: Tests for the simulated power supply.
// ============================================================================
//! ## Overview
//! Validates idempotent output control and the settle budget.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use std::time::Duration;

use rig_core::interfaces::PowerSupply;
use rig_hw::SETTLE_SECS_PER_NODE;
use rig_hw::SimulatedPsu;

#[test]
fn test_power_on_and_off_are_idempotent() {
    let psu = SimulatedPsu::new(3);
    assert!(!psu.is_on());

    psu.power_on().unwrap();
    psu.power_on().unwrap();
    assert!(psu.is_on());

    psu.power_off().unwrap();
    psu.power_off().unwrap();
    assert!(!psu.is_on());
}

#[test]
fn test_settle_budget_scales_with_node_count() {
    let psu = SimulatedPsu::new(3);
    assert_eq!(psu.settle_budget(), Duration::from_secs(3 * SETTLE_SECS_PER_NODE));
}
