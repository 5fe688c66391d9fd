// crates/rig-hw/src/link.rs
// ============================================================================
// Module: Rig Hardware Simulated Link
// Description: Deterministic in-memory hardware link.
// Purpose: Back sessions with a scriptable device chain.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! `SimulatedLink` implements the hardware link over an in-memory chain
//! description, typically loaded from a robot entry in configuration. Command
//! outcomes and fault state are scriptable per device, so sessions and tests
//! can exercise every branch of the phase machine without a fieldbus. The
//! real transport behind a rig is out of scope for the harness core.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;

use rig_core::CommandStatus;
use rig_core::Device;
use rig_core::DeviceAddress;
use rig_core::interfaces::HardwareLink;
use rig_core::interfaces::LinkError;

// ============================================================================
// SECTION: Simulated Link
// ============================================================================

/// Scriptable in-memory hardware link.
pub struct SimulatedLink {
    /// Devices reported by discovery.
    devices: Vec<Device>,
    /// Scripted command outcomes keyed by (address, command name).
    outcomes: Mutex<HashMap<(DeviceAddress, String), CommandStatus>>,
    /// Devices with an active fault.
    faulted: Mutex<HashSet<DeviceAddress>>,
    /// Simulate a dead link: every call fails.
    disconnected: bool,
}

impl SimulatedLink {
    /// Creates a link over the given chain.
    #[must_use]
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            outcomes: Mutex::new(HashMap::new()),
            faulted: Mutex::new(HashSet::new()),
            disconnected: false,
        }
    }

    /// Creates a link that refuses every call.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            devices: Vec::new(),
            outcomes: Mutex::new(HashMap::new()),
            faulted: Mutex::new(HashSet::new()),
            disconnected: true,
        }
    }

    /// Scripts the outcome of one command on one device.
    ///
    /// Unscripted commands complete without error.
    pub fn script_outcome(
        &self,
        address: DeviceAddress,
        command: impl Into<String>,
        status: CommandStatus,
    ) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.insert((address, command.into()), status);
        }
    }

    /// Marks a device as faulted until the next fault reset.
    pub fn inject_fault(&self, address: DeviceAddress) {
        if let Ok(mut faulted) = self.faulted.lock() {
            faulted.insert(address);
        }
    }

    /// Returns whether a device currently has an active fault.
    #[must_use]
    pub fn has_fault(&self, address: DeviceAddress) -> bool {
        self.faulted.lock().map(|faulted| faulted.contains(&address)).unwrap_or(false)
    }
}

impl HardwareLink for SimulatedLink {
    fn discover(&self) -> Result<Vec<Device>, LinkError> {
        if self.disconnected {
            return Err(LinkError::Connect("link is down".to_string()));
        }
        tracing::debug!(count = self.devices.len(), "simulated discovery");
        Ok(self.devices.clone())
    }

    fn execute(&self, address: DeviceAddress, command: &str) -> Result<CommandStatus, LinkError> {
        if self.disconnected {
            return Err(LinkError::Disconnected("link is down".to_string()));
        }
        if !self.devices.iter().any(|device| device.address == address) {
            return Err(LinkError::Command(format!("unknown device address {address}")));
        }
        let status = self
            .outcomes
            .lock()
            .map_err(|_| LinkError::Command("outcome table poisoned".to_string()))?
            .get(&(address, command.to_string()))
            .copied()
            .unwrap_or(CommandStatus::Completed);
        tracing::debug!(%address, command, "simulated command");
        Ok(status)
    }

    fn fault_reset(&self, address: DeviceAddress) -> Result<(), LinkError> {
        if self.disconnected {
            return Err(LinkError::Disconnected("link is down".to_string()));
        }
        if !self.devices.iter().any(|device| device.address == address) {
            return Err(LinkError::Command(format!("unknown device address {address}")));
        }
        if let Ok(mut faulted) = self.faulted.lock() {
            faulted.remove(&address);
        }
        Ok(())
    }
}
