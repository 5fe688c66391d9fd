// crates/rig-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Argument Tests
// Description: Tests for argument parsing and option mapping.
// ============================================================================
//! ## Overview
//! Validates the parser surface: mutual exclusion of the position filters,
//! defaults, and the log-level mapping.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

use clap::Parser;

use super::CheckoutArg;
use super::Cli;
use super::Commands;
use super::EngineArg;
use super::LogLevelArg;
use super::TracebackArg;

#[test]
fn test_inc_and_exc_conflict_at_the_parser() {
    let parsed = Cli::try_parse_from(["rig", "session", "--inc", "1", "--exc", "2"]);
    assert!(parsed.is_err());
}

#[test]
fn test_session_defaults() {
    let cli = Cli::try_parse_from(["rig", "session"]).unwrap();
    let Commands::Session(command) = cli.command else {
        unreachable!("parsed a session command");
    };
    assert_eq!(command.address, "localhost");
    assert!(!command.flash_fw);
    assert!(!command.control_psu);
    assert_eq!(command.traceback, TracebackArg::Short);
}

#[test]
fn test_run_defaults_to_local_engine_and_copy_checkout() {
    let cli = Cli::try_parse_from(["rig", "run", "--label", "daq"]).unwrap();
    let Commands::Run(command) = cli.command else {
        unreachable!("parsed a run command");
    };
    assert_eq!(command.engine, EngineArg::Local);
    assert_eq!(command.checkout, CheckoutArg::Copy);
    assert!(command.timeout_mins.is_none());
}

#[test]
fn test_log_level_directives() {
    assert_eq!(LogLevelArg::Error.directive(), "error");
    assert_eq!(LogLevelArg::Debug.directive(), "debug");
    assert_eq!(LogLevelArg::Trace.directive(), "trace");
}

#[test]
fn test_missing_label_is_a_parse_error() {
    assert!(Cli::try_parse_from(["rig", "run"]).is_err());
}
