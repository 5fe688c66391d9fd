// crates/rig-core/src/interfaces/mod.rs
// ============================================================================
// Module: Rig Harness Interfaces
// Description: Backend-agnostic interfaces for execution and hardware access.
// Purpose: Define the contract surfaces used by the harness runtime.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the harness integrates with container engines,
//! source checkouts, and hardware rigs without embedding backend-specific
//! details. Implementations must fail closed: a collaborator that cannot
//! answer reports an error rather than a fabricated success.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::CommandStatus;
use crate::core::Device;
use crate::core::DeviceAddress;
use crate::core::TargetId;

// ============================================================================
// SECTION: Container Engine
// ============================================================================

/// Container engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Environment could not be acquired or the command could not start.
    #[error("container start failed: {0}")]
    StartFailed(String),
    /// Environment release failed.
    #[error("container stop failed: {0}")]
    StopFailed(String),
    /// Engine is unavailable on this agent.
    #[error("container engine unavailable: {0}")]
    Unavailable(String),
}

/// Opaque "run a command in an isolated environment" capability.
///
/// # Invariants
/// - `start` blocks until the command exits and returns its exit code.
/// - `stop` releases all resources held under `name` and is idempotent under
///   repeated-call-after-failure; stopping an unknown name succeeds.
pub trait ContainerEngine: Send + Sync {
    /// Starts the command in an isolated environment and blocks until exit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the environment cannot be acquired or the
    /// command cannot be started. A non-zero exit code of the command itself
    /// is not an error.
    fn start(&self, command: &[String], workdir: &Path, name: &TargetId)
    -> Result<i32, EngineError>;

    /// Releases the environment named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when release fails; callers log and continue.
    fn stop(&self, name: &TargetId) -> Result<(), EngineError>;
}

// ============================================================================
// SECTION: Source Checkout
// ============================================================================

/// Source checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout command or copy failed.
    #[error("source checkout failed: {0}")]
    Failed(String),
    /// Filesystem error while preparing the workdir.
    #[error("checkout io error: {0}")]
    Io(String),
}

/// Source checkout into a run target's working directory.
pub trait SourceCheckout: Send + Sync {
    /// Populates `workdir` with the test source tree.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] when the checkout fails.
    fn checkout(&self, workdir: &Path) -> Result<(), CheckoutError>;
}

// ============================================================================
// SECTION: Hardware Link
// ============================================================================

/// Hardware link errors.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Connection to the rig could not be established.
    #[error("link connect failed: {0}")]
    Connect(String),
    /// Device discovery failed.
    #[error("device discovery failed: {0}")]
    Discovery(String),
    /// A device command could not be issued.
    #[error("device command failed: {0}")]
    Command(String),
    /// The rig disconnected mid-session; the environment is unusable.
    #[error("link disconnected: {0}")]
    Disconnected(String),
}

impl LinkError {
    /// Returns whether the error signals an unusable environment.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

/// Wrapper over the rig transport exposing discovery and per-device commands.
///
/// The transport itself (fieldbus, serial, simulation) is out of scope; the
/// runtime only depends on discovery producing a device list and commands
/// reporting a [`CommandStatus`].
pub trait HardwareLink {
    /// Enumerates connected devices. Called once per session.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] when discovery fails. An empty device list is a
    /// valid result, not an error.
    fn discover(&self) -> Result<Vec<Device>, LinkError>;

    /// Issues a named command to one device and returns its final status.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] when the command cannot be issued at all;
    /// command-level failures surface through [`CommandStatus`].
    fn execute(&self, address: DeviceAddress, command: &str)
    -> Result<CommandStatus, LinkError>;

    /// Resets an active fault on one device.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] when the reset cannot be issued.
    fn fault_reset(&self, address: DeviceAddress) -> Result<(), LinkError>;
}

// ============================================================================
// SECTION: Power Supply
// ============================================================================

/// Power supply errors.
#[derive(Debug, Error)]
pub enum PsuError {
    /// Power supply did not accept the command.
    #[error("power supply error: {0}")]
    Control(String),
}

/// Remote-controlled power supply for the rig.
///
/// # Invariants
/// - `power_on` and `power_off` are idempotent.
pub trait PowerSupply {
    /// Switches the output on and waits for the chain to settle.
    ///
    /// # Errors
    ///
    /// Returns [`PsuError`] when the supply rejects the command.
    fn power_on(&self) -> Result<(), PsuError>;

    /// Switches the output off.
    ///
    /// # Errors
    ///
    /// Returns [`PsuError`] when the supply rejects the command.
    fn power_off(&self) -> Result<(), PsuError>;
}
