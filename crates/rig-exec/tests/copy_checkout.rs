// crates/rig-exec/tests/copy_checkout.rs
// ============================================================================
// Module: Copy Checkout Tests
// Description: Tests for the directory-copy checkout.
// ============================================================================
//! ## Overview
//! Validates recursive copying, fresh-per-iteration workdirs, and the
//! missing-source failure.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use std::fs;

use rig_core::interfaces::SourceCheckout;
use rig_exec::CopyCheckout;

#[test]
fn test_copies_nested_tree_into_workdir() {
    let source = tempfile::tempdir().unwrap();
    fs::create_dir_all(source.path().join("motor_test/test")).unwrap();
    fs::write(source.path().join("motor_test/test/case.toml"), "x = 1").unwrap();
    let root = tempfile::tempdir().unwrap();
    let workdir = root.path().join("robot-1");

    CopyCheckout::new(source.path()).checkout(&workdir).unwrap();

    assert!(workdir.join("motor_test/test/case.toml").is_file());
}

#[test]
fn test_checkout_replaces_a_stale_workdir() {
    let source = tempfile::tempdir().unwrap();
    fs::write(source.path().join("fresh.txt"), "fresh").unwrap();
    let root = tempfile::tempdir().unwrap();
    let workdir = root.path().join("robot-1");
    fs::create_dir_all(&workdir).unwrap();
    fs::write(workdir.join("stale.txt"), "stale").unwrap();

    CopyCheckout::new(source.path()).checkout(&workdir).unwrap();

    assert!(workdir.join("fresh.txt").is_file());
    assert!(!workdir.join("stale.txt").exists());
}

#[test]
fn test_missing_source_fails_closed() {
    let root = tempfile::tempdir().unwrap();
    let checkout = CopyCheckout::new(root.path().join("absent"));
    assert!(checkout.checkout(&root.path().join("workdir")).is_err());
}
