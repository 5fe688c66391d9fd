// crates/rig-exec/src/engine/mod.rs
// ============================================================================
// Module: Rig Exec Engines
// Description: Container engine implementations.
// Purpose: Provide docker and local-process execution backends.
// Dependencies: crate::engine::{docker, local}
// ============================================================================

//! ## Overview
//! Engines implement the core [`rig_core::interfaces::ContainerEngine`]
//! contract: `start` blocks until the test command exits, `stop` releases
//! resources and is idempotent under repeated-call-after-failure.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod docker;
pub mod local;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use docker::DockerEngine;
pub use local::LocalEngine;
