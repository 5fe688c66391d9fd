// crates/rig-core/src/runtime/mod.rs
// ============================================================================
// Module: Rig Harness Runtime
// Description: Selector, dispatch loop, session engine, and report builder.
// Purpose: Provide the executable harness logic over the core model.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime wires the core model to the collaborator interfaces: label
//! selection produces agents, the dispatch loop maps run targets through
//! isolated environments, the session engine gates scenarios through the
//! three-phase machine, and the report builder emits the CI artifacts.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod dispatch;
pub mod report;
pub mod selector;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatch::TargetTemplate;
pub use dispatch::plan_targets;
pub use dispatch::run_target;
pub use dispatch::run_targets;
pub use report::JUNIT_RESULT_RELATIVE_PATH;
pub use report::ReportError;
pub use report::junit_report;
pub use report::rst_summary;
pub use report::write_junit;
pub use report::write_summary;
pub use selector::select_agents;
pub use session::ActionOutcome;
pub use session::DEFAULT_LOG_TAIL_LINES;
pub use session::LogBuffer;
pub use session::Scenario;
pub use session::ScenarioAction;
pub use session::SessionContext;
pub use session::SessionError;
pub use session::SessionOptions;
pub use session::SessionRunner;
