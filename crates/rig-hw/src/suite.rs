// crates/rig-hw/src/suite.rs
// ============================================================================
// Module: Rig Hardware Acceptance Suite
// Description: Standard scenario set for servo-drive acceptance sessions.
// Purpose: Compose stock actions into the scenarios a session runs.
// Dependencies: rig-core, crate::{actions, command}
// ============================================================================

//! ## Overview
//! The acceptance suite is the default scenario list for a rig session:
//! firmware flash first (opt-in), a link check, then the device procedures.
//! Every device-dependent scenario skips cleanly on an empty chain, and every
//! scenario tears down with a fault reset so a failed procedure never leaks
//! fault state into the next one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rig_core::Scenario;

use crate::actions::DeviceCommandAction;
use crate::actions::FaultResetAction;
use crate::actions::VerifyLinkAction;
use crate::command::DeviceCommandKind;

// ============================================================================
// SECTION: Suite Construction
// ============================================================================

/// Builds the standard acceptance scenario list.
///
/// `expected_devices` is the configured chain length, used by link
/// verification; pass `None` when the chain length is not known up front.
#[must_use]
pub fn acceptance_suite(expected_devices: Option<usize>) -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    let mut flash = Scenario::new("flash-firmware");
    flash.flash_gated = true;
    flash.run_first = true;
    flash.needs_devices = true;
    flash.execution.push(Box::new(DeviceCommandAction::new(DeviceCommandKind::FlashFirmware)));
    flash.teardown.push(Box::new(FaultResetAction));
    scenarios.push(flash);

    let mut link_check = Scenario::new("link-check");
    link_check.setup.push(Box::new(match expected_devices {
        Some(expected) => VerifyLinkAction::expecting(expected),
        None => VerifyLinkAction::any(),
    }));
    scenarios.push(link_check);

    for command in [
        DeviceCommandKind::CommutationOffsetMeasurement,
        DeviceCommandKind::PhaseOrderDetection,
        DeviceCommandKind::OpenPhaseDetection,
        DeviceCommandKind::PolePairDetection,
    ] {
        scenarios.push(procedure(command, expected_devices));
    }

    scenarios
}

/// Builds one device-procedure scenario.
fn procedure(command: DeviceCommandKind, expected_devices: Option<usize>) -> Scenario {
    let mut scenario = Scenario::new(command.as_str().replace('_', "-"));
    scenario.needs_devices = true;
    scenario.setup.push(Box::new(match expected_devices {
        Some(expected) => VerifyLinkAction::expecting(expected),
        None => VerifyLinkAction::any(),
    }));
    scenario.execution.push(Box::new(DeviceCommandAction::new(command)));
    scenario.teardown.push(Box::new(FaultResetAction));
    scenario
}
