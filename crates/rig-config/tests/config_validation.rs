// crates/rig-config/tests/config_validation.rs
// ============================================================================
// Module: Configuration Validation Tests
// Description: Tests for config parsing, defaults, and fail-closed validation.
// ============================================================================
//! ## Overview
//! Validates the TOML schema, serde defaults, and every validation rejection.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use rig_config::ConfigError;
use rig_config::load_from_str;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// A complete, valid configuration.
const VALID: &str = r#"
[[agents]]
name = "robot-2"
labels = ["daq", "gpio"]

[[agents]]
name = "robot-3"
labels = ["axis"]

[[robots]]
name = "robot-2"
agent = "robot-2"
address = "192.168.0.10"

[[robots.chain]]
position = 0
address = 1001
name = "Node 2000"
capabilities = ["gpio"]

[[robots.chain]]
position = 1
address = 1002
name = "Safety Module"

[runner]
test_dir = "motor_test"
command = ["rig", "session"]
workdir_root = "work"
timeout_mins = 120
"#;

// ============================================================================
// SECTION: Parsing and Defaults
// ============================================================================

#[test]
fn test_valid_config_parses() {
    let config = load_from_str(VALID).unwrap();
    assert_eq!(config.agents.len(), 2);
    assert_eq!(config.robots.len(), 1);
    assert_eq!(config.runner.timeout_mins, 120);
}

#[test]
fn test_runner_defaults_apply() {
    let config = load_from_str(
        r#"
[[agents]]
name = "robot-1"
labels = ["axis"]
"#,
    )
    .unwrap();
    assert_eq!(config.runner.timeout_mins, 120);
    assert!(!config.runner.command.is_empty());
    assert!(config.runner.image.is_none());
}

#[test]
fn test_agent_inventory_conversion() {
    let config = load_from_str(VALID).unwrap();
    let agents = config.agent_inventory();
    assert!(agents.iter().any(|agent| agent.has_label("daq")));
}

#[test]
fn test_robot_chain_conversion_preserves_positions() {
    let config = load_from_str(VALID).unwrap();
    let chain = config.robot_chain("robot-2").unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].position.value(), 0);
    assert!(chain[1].is_safety_module());
}

#[test]
fn test_unknown_robot_chain_is_none() {
    let config = load_from_str(VALID).unwrap();
    assert!(config.robot_chain("robot-9").is_none());
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    assert!(matches!(load_from_str("agents = 3"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_reads_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rig.toml");
    std::fs::write(&path, VALID).unwrap();
    let config = rig_config::load(Some(&path)).unwrap();
    assert_eq!(config.agents.len(), 2);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(rig_config::load(Some(&path)), Err(ConfigError::Io(_))));
}

// ============================================================================
// SECTION: Validation Rejections
// ============================================================================

#[test]
fn test_duplicate_agent_names_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = ["axis"]

[[agents]]
name = "robot-1"
labels = ["daq"]
"#;
    assert!(matches!(load_from_str(raw), Err(ConfigError::DuplicateAgent(name)) if name == "robot-1"));
}

#[test]
fn test_agent_without_labels_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = []
"#;
    assert!(matches!(load_from_str(raw), Err(ConfigError::EmptyLabels(_))));
}

#[test]
fn test_blank_label_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = ["  "]
"#;
    assert!(matches!(load_from_str(raw), Err(ConfigError::BlankLabel(_))));
}

#[test]
fn test_robot_with_unknown_agent_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = ["axis"]

[[robots]]
name = "robot-9"
agent = "robot-9"
address = "localhost"
"#;
    assert!(matches!(
        load_from_str(raw),
        Err(ConfigError::UnknownAgent { robot, agent }) if robot == "robot-9" && agent == "robot-9"
    ));
}

#[test]
fn test_duplicate_chain_positions_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = ["axis"]

[[robots]]
name = "robot-1"
agent = "robot-1"
address = "localhost"

[[robots.chain]]
position = 0
address = 1001
name = "Node 2000"

[[robots.chain]]
position = 0
address = 1002
name = "Circulo"
"#;
    assert!(matches!(
        load_from_str(raw),
        Err(ConfigError::DuplicatePosition { position: 0, .. })
    ));
}

#[test]
fn test_zero_timeout_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = ["axis"]

[runner]
timeout_mins = 0
"#;
    assert!(matches!(load_from_str(raw), Err(ConfigError::ZeroTimeout)));
}

#[test]
fn test_empty_command_rejected() {
    let raw = r#"
[[agents]]
name = "robot-1"
labels = ["axis"]

[runner]
command = []
"#;
    assert!(matches!(load_from_str(raw), Err(ConfigError::EmptyCommand)));
}
