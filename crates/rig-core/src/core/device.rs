// crates/rig-core/src/core/device.rs
// ============================================================================
// Module: Rig Harness Devices
// Description: Discovered hardware units and device command status values.
// Purpose: Model the per-session device inventory and command outcomes.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Devices are discovered once per test session and live for that session
//! only. A device's chain position is its index within the physical chain,
//! which is not necessarily its index in the discovered list; selection
//! filters always address devices by chain position.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Device Identity
// ============================================================================

/// Bus address of a device on its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceAddress(u32);

impl DeviceAddress {
    /// Creates a device address.
    #[must_use]
    pub const fn new(address: u32) -> Self {
        Self(address)
    }

    /// Returns the raw address value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Position of a device within its chain, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainPosition(u32);

impl ChainPosition {
    /// Creates a chain position.
    #[must_use]
    pub const fn new(position: u32) -> Self {
        Self(position)
    }

    /// Returns the raw position value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChainPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Device
// ============================================================================

/// One hardware unit discovered at test-session start.
///
/// # Invariants
/// - Lifetime is one test session; devices are rediscovered per session.
/// - `position` is the device's chain position, not its discovery index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Bus address used to issue commands to the device.
    pub address: DeviceAddress,
    /// Position in the chain.
    pub position: ChainPosition,
    /// Device name from the hardware description.
    pub name: String,
    /// Capability tags from the hardware description.
    pub capabilities: Vec<String>,
}

impl Device {
    /// Returns whether the device is a safety module.
    ///
    /// Safety modules do not accept fault resets and are excluded from the
    /// pre-scenario fault sweep.
    #[must_use]
    pub fn is_safety_module(&self) -> bool {
        self.name.to_ascii_lowercase().contains("safety")
    }
}

// ============================================================================
// SECTION: Command Status
// ============================================================================

/// Status of a device command issued through the hardware link.
///
/// # Invariants
/// - Variants are stable for serialization and report matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandStatus {
    /// Command completed without error.
    Completed,
    /// Command completed with an error code.
    CompletedWithError(CommandError),
    /// Command still in progress, with percent completion.
    InProgress(u8),
}

impl CommandStatus {
    /// Returns whether the command has finished (with or without error).
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        !matches!(self, Self::InProgress(_))
    }

    /// Returns whether the command failed terminally.
    ///
    /// Aborted and timed-out commands leave the device in an unknown state
    /// and are treated as terminal for the current phase.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CompletedWithError(CommandError::Aborted | CommandError::Timeout)
        )
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::CompletedWithError(error) => write!(f, "completed with error ({error})"),
            Self::InProgress(percent) => write!(f, "in progress ({percent}%)"),
        }
    }
}

/// Error codes reported by a finished device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandError {
    /// Command is not allowed in the current device state.
    NotAllowed,
    /// Command was aborted before completion.
    Aborted,
    /// Command timed out on the device.
    Timeout,
    /// Command is not supported by the device.
    Unsupported,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotAllowed => "not allowed",
            Self::Aborted => "aborted",
            Self::Timeout => "timeout",
            Self::Unsupported => "unsupported",
        };
        f.write_str(label)
    }
}
