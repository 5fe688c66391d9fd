// crates/rig-exec/src/checkout/mod.rs
// ============================================================================
// Module: Rig Exec Checkouts
// Description: Source checkout implementations.
// Purpose: Provide git and directory-copy checkout backends.
// Dependencies: crate::checkout::{copy, git}
// ============================================================================

//! ## Overview
//! Checkouts implement the core [`rig_core::interfaces::SourceCheckout`]
//! contract: populate a target's workdir with the test source tree, fresh per
//! iteration.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod copy;
pub mod git;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use copy::CopyCheckout;
pub use git::GitCheckout;
