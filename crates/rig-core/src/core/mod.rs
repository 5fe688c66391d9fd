// crates/rig-core/src/core/mod.rs
// ============================================================================
// Module: Rig Harness Core Types
// Description: Canonical harness data model.
// Purpose: Provide stable, serializable types for agents, devices, and results.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the agent inventory, run targets, discovered devices,
//! selection filters, and result records. These types are the canonical
//! source of truth for any derived surfaces (reports, CLI output).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod agent;
pub mod device;
pub mod filter;
pub mod identifiers;
pub mod result;
pub mod target;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use agent::Agent;
pub use device::ChainPosition;
pub use device::CommandError;
pub use device::CommandStatus;
pub use device::Device;
pub use device::DeviceAddress;
pub use filter::FilterError;
pub use filter::PositionSpec;
pub use filter::SelectionFilter;
pub use identifiers::AgentId;
pub use identifiers::RobotId;
pub use identifiers::ScenarioId;
pub use identifiers::SessionId;
pub use identifiers::TargetId;
pub use result::ActionFailure;
pub use result::DispatchReport;
pub use result::ExitStatus;
pub use result::Phase;
pub use result::ScenarioResult;
pub use result::ScenarioStatus;
pub use result::SessionReport;
pub use result::TargetOutcome;
pub use result::TargetReport;
pub use result::TargetStage;
pub use target::RunTarget;
pub use time::Clock;
pub use time::LogicalClock;
pub use time::Timestamp;
