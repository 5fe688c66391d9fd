// crates/rig-hw/src/actions.rs
// ============================================================================
// Module: Rig Hardware Stock Actions
// Description: Reusable scenario actions over the hardware link.
// Purpose: Bridge device commands into the session phase machine.
// Dependencies: rig-core, crate::command
// ============================================================================

//! ## Overview
//! Stock actions cover the common precondition, execution, and cleanup steps
//! of acceptance scenarios: link verification, device command execution, and
//! fault reset. Command outcomes map onto the action taxonomy: tolerance-
//! style command errors are recoverable failures, aborted or timed-out
//! commands are terminal, and a disconnected link is always terminal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rig_core::ActionOutcome;
use rig_core::CommandStatus;
use rig_core::ScenarioAction;
use rig_core::SessionContext;
use rig_core::interfaces::LinkError;

use crate::command::DeviceCommandKind;

// ============================================================================
// SECTION: Link Verification
// ============================================================================

/// Precondition action checking the discovered chain against expectations.
pub struct VerifyLinkAction {
    /// Expected device count, when the robot's chain length is known.
    expected: Option<usize>,
}

impl VerifyLinkAction {
    /// Verifies only that at least one device answered discovery.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            expected: None,
        }
    }

    /// Verifies that exactly `expected` devices answered discovery.
    #[must_use]
    pub const fn expecting(expected: usize) -> Self {
        Self {
            expected: Some(expected),
        }
    }
}

impl ScenarioAction for VerifyLinkAction {
    fn name(&self) -> &str {
        "verify_link"
    }

    fn run(&self, ctx: &mut SessionContext<'_>) -> ActionOutcome {
        let discovered = ctx.devices().len();
        ctx.log(format!("discovered {discovered} devices"));
        match self.expected {
            _ if discovered == 0 => {
                ActionOutcome::Fail("no devices answered discovery".to_string())
            }
            Some(expected) if discovered != expected => ActionOutcome::Fail(format!(
                "expected {expected} devices on the chain, discovered {discovered}"
            )),
            _ => ActionOutcome::Pass,
        }
    }
}

// ============================================================================
// SECTION: Device Commands
// ============================================================================

/// Runs one device command on every selected device.
pub struct DeviceCommandAction {
    /// Command to execute.
    command: DeviceCommandKind,
}

impl DeviceCommandAction {
    /// Creates an action for the given command.
    #[must_use]
    pub const fn new(command: DeviceCommandKind) -> Self {
        Self {
            command,
        }
    }
}

impl ScenarioAction for DeviceCommandAction {
    fn name(&self) -> &str {
        self.command.as_str()
    }

    fn run(&self, ctx: &mut SessionContext<'_>) -> ActionOutcome {
        for device in ctx.devices() {
            let status = match ctx.link().execute(device.address, self.command.as_str()) {
                Ok(status) => status,
                Err(err) => return outcome_for_link_error(&err),
            };
            ctx.log(format!(
                "{} on {} at position {}: {status}",
                self.command, device.name, device.position
            ));
            match status {
                CommandStatus::Completed => {}
                CommandStatus::CompletedWithError(error) if status.is_terminal() => {
                    return ActionOutcome::Fatal(format!(
                        "{} {error} on {} at position {}",
                        self.command, device.name, device.position
                    ));
                }
                CommandStatus::CompletedWithError(error) => {
                    return ActionOutcome::Fail(format!(
                        "{} failed ({error}) on {} at position {}",
                        self.command, device.name, device.position
                    ));
                }
                CommandStatus::InProgress(percent) => {
                    return ActionOutcome::Fail(format!(
                        "{} still in progress ({percent}%) on {} at position {}",
                        self.command, device.name, device.position
                    ));
                }
            }
        }
        ActionOutcome::Pass
    }
}

// ============================================================================
// SECTION: Fault Reset
// ============================================================================

/// Cleanup action resetting faults on every non-safety device.
pub struct FaultResetAction;

impl ScenarioAction for FaultResetAction {
    fn name(&self) -> &str {
        "fault_reset"
    }

    fn run(&self, ctx: &mut SessionContext<'_>) -> ActionOutcome {
        for device in ctx.devices() {
            if device.is_safety_module() {
                continue;
            }
            if let Err(err) = ctx.link().fault_reset(device.address) {
                return outcome_for_link_error(&err);
            }
        }
        ActionOutcome::Pass
    }
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps a link error onto the action taxonomy.
fn outcome_for_link_error(err: &LinkError) -> ActionOutcome {
    if err.is_terminal() {
        ActionOutcome::Fatal(err.to_string())
    } else {
        ActionOutcome::Fail(err.to_string())
    }
}
