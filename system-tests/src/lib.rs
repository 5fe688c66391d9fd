// system-tests/src/lib.rs
// ============================================================================
// Module: Rig Harness System Test Helpers
// Description: Shared fixtures for end-to-end harness tests.
// Purpose: Build configurations and chains without repeating TOML in suites.
// Dependencies: rig-config, rig-core
// ============================================================================

//! ## Overview
//! Helpers for the end-to-end suites: a canned two-robot configuration and a
//! chain builder. Suites exercise the full stack (config, selection,
//! dispatch, session, report) with local processes and the simulated link.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rig_config::HarnessConfig;
use rig_core::ChainPosition;
use rig_core::Device;
use rig_core::DeviceAddress;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Canned configuration with two labeled agents and one robot chain.
///
/// # Panics
///
/// Panics if the embedded fixture TOML stops being valid.
#[must_use]
pub fn two_robot_config() -> HarnessConfig {
    let raw = r#"
[[agents]]
name = "robot-2"
labels = ["daq", "gpio"]

[[agents]]
name = "robot-3"
labels = ["daq"]

[[robots]]
name = "robot-2"
agent = "robot-2"
address = "192.168.0.10"

[[robots.chain]]
position = 0
address = 1001
name = "Node 2000"

[[robots.chain]]
position = 1
address = 1002
name = "Circulo"

[runner]
timeout_mins = 5
"#;
    match rig_config::load_from_str(raw) {
        Ok(config) => config,
        Err(err) => unreachable!("fixture TOML is valid: {err}"),
    }
}

/// Builds a chain of `len` devices with ascending positions.
#[must_use]
pub fn chain(len: u32) -> Vec<Device> {
    (0..len)
        .map(|position| Device {
            address: DeviceAddress::new(1000 + position),
            position: ChainPosition::new(position),
            name: format!("node-{position}"),
            capabilities: Vec::new(),
        })
        .collect()
}
