// crates/rig-hw/tests/simulated_link.rs
// ============================================================================
// Module: Simulated Link Tests
// Description: Tests for the scriptable in-memory hardware link.
// ============================================================================
//! ## Overview
//! Validates discovery, scripted command outcomes, fault state, and the
//! disconnected-link behavior.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use rig_core::ChainPosition;
use rig_core::CommandError;
use rig_core::CommandStatus;
use rig_core::Device;
use rig_core::DeviceAddress;
use rig_core::interfaces::HardwareLink;
use rig_core::interfaces::LinkError;
use rig_hw::SimulatedLink;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a two-node chain.
fn chain() -> Vec<Device> {
    vec![
        Device {
            address: DeviceAddress::new(1001),
            position: ChainPosition::new(0),
            name: "Node 2000".to_string(),
            capabilities: vec!["gpio".to_string()],
        },
        Device {
            address: DeviceAddress::new(1002),
            position: ChainPosition::new(1),
            name: "Circulo".to_string(),
            capabilities: Vec::new(),
        },
    ]
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

#[test]
fn test_discovery_returns_the_configured_chain() {
    let link = SimulatedLink::new(chain());
    let devices = link.discover().unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].position.value(), 0);
}

#[test]
fn test_disconnected_link_refuses_discovery() {
    let link = SimulatedLink::disconnected();
    assert!(matches!(link.discover(), Err(LinkError::Connect(_))));
}

// ============================================================================
// SECTION: Commands
// ============================================================================

#[test]
fn test_unscripted_commands_complete() {
    let link = SimulatedLink::new(chain());
    let status = link.execute(DeviceAddress::new(1001), "pole_pair_detection").unwrap();
    assert_eq!(status, CommandStatus::Completed);
}

#[test]
fn test_scripted_outcome_is_returned() {
    let link = SimulatedLink::new(chain());
    link.script_outcome(
        DeviceAddress::new(1002),
        "commutation_offset_measurement",
        CommandStatus::CompletedWithError(CommandError::Aborted),
    );

    let status = link.execute(DeviceAddress::new(1002), "commutation_offset_measurement").unwrap();

    assert!(status.is_terminal());
    // The other device is unaffected.
    let other = link.execute(DeviceAddress::new(1001), "commutation_offset_measurement").unwrap();
    assert_eq!(other, CommandStatus::Completed);
}

#[test]
fn test_unknown_address_is_a_command_error() {
    let link = SimulatedLink::new(chain());
    assert!(matches!(
        link.execute(DeviceAddress::new(9999), "pole_pair_detection"),
        Err(LinkError::Command(_))
    ));
}

// ============================================================================
// SECTION: Fault State
// ============================================================================

#[test]
fn test_fault_reset_clears_injected_fault() {
    let link = SimulatedLink::new(chain());
    let address = DeviceAddress::new(1001);
    link.inject_fault(address);
    assert!(link.has_fault(address));

    link.fault_reset(address).unwrap();

    assert!(!link.has_fault(address));
}

#[test]
fn test_disconnected_link_fault_reset_is_terminal() {
    let link = SimulatedLink::disconnected();
    let err = link.fault_reset(DeviceAddress::new(1001)).unwrap_err();
    assert!(err.is_terminal());
}
