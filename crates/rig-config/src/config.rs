// crates/rig-config/src/config.rs
// ============================================================================
// Module: Rig Harness Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: rig-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a strict size limit. Missing
//! or invalid configuration fails closed; validation rejects duplicate
//! agents, dangling robot references, duplicate chain positions, and
//! degenerate runner settings before any dispatch starts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use rig_core::Agent;
use rig_core::ChainPosition;
use rig_core::Device;
use rig_core::DeviceAddress;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "rig.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "RIG_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default global dispatch timeout in minutes.
const DEFAULT_TIMEOUT_MINS: u64 = 120;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Execution agent inventory.
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    /// Robot (device chain) descriptions.
    #[serde(default)]
    pub robots: Vec<RobotConfig>,
    /// Runner settings for dispatch.
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// One execution agent entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name (the agent's self label).
    pub name: String,
    /// Labels the agent satisfies.
    pub labels: Vec<String>,
}

impl AgentConfig {
    /// Converts the entry into the core agent model.
    #[must_use]
    pub fn to_agent(&self) -> Agent {
        Agent::new(self.name.as_str(), self.labels.clone())
    }
}

/// One robot entry: a named chain of devices hosted by an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Robot name.
    pub name: String,
    /// Hosting agent name.
    pub agent: String,
    /// Rig address used by the session (`--address`).
    pub address: String,
    /// Devices in the chain.
    #[serde(default)]
    pub chain: Vec<DeviceConfig>,
}

/// One device entry within a robot chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Chain position.
    pub position: u32,
    /// Bus address.
    pub address: u32,
    /// Device name.
    pub name: String,
    /// Capability tags.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl DeviceConfig {
    /// Converts the entry into the core device model.
    #[must_use]
    pub fn to_device(&self) -> Device {
        Device {
            address: DeviceAddress::new(self.address),
            position: ChainPosition::new(self.position),
            name: self.name.clone(),
            capabilities: self.capabilities.clone(),
        }
    }
}

/// Runner settings for dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Test directory handed to each run target.
    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,
    /// Test command executed inside each environment.
    #[serde(default = "default_command")]
    pub command: Vec<String>,
    /// Root under which each target gets its own workdir.
    #[serde(default = "default_workdir_root")]
    pub workdir_root: PathBuf,
    /// Global dispatch timeout in minutes.
    #[serde(default = "default_timeout_mins")]
    pub timeout_mins: u64,
    /// Container image for the docker engine, when used.
    #[serde(default)]
    pub image: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            test_dir: default_test_dir(),
            command: default_command(),
            workdir_root: default_workdir_root(),
            timeout_mins: default_timeout_mins(),
            image: None,
        }
    }
}

/// Default test directory.
fn default_test_dir() -> PathBuf {
    PathBuf::from("motor_test")
}

/// Default test command.
fn default_command() -> Vec<String> {
    vec!["rig".to_string(), "session".to_string()]
}

/// Default workdir root.
fn default_workdir_root() -> PathBuf {
    PathBuf::from("work")
}

/// Default global timeout in minutes.
const fn default_timeout_mins() -> u64 {
    DEFAULT_TIMEOUT_MINS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file exceeds the size limit.
    #[error("config file is {size} bytes; maximum is {max}")]
    TooLarge {
        /// Actual file size.
        size: usize,
        /// Maximum permitted size.
        max: usize,
    },
    /// Config file is not valid TOML for the expected schema.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Two agents share a name.
    #[error("duplicate agent name: {0}")]
    DuplicateAgent(String),
    /// Agent declares no labels.
    #[error("agent {0} declares no labels")]
    EmptyLabels(String),
    /// Agent declares a blank label.
    #[error("agent {0} declares a blank label")]
    BlankLabel(String),
    /// Robot references an agent that is not in the inventory.
    #[error("robot {robot} references unknown agent {agent}")]
    UnknownAgent {
        /// Robot name.
        robot: String,
        /// Referenced agent name.
        agent: String,
    },
    /// Two devices in one chain share a position.
    #[error("robot {robot} declares duplicate chain position {position}")]
    DuplicatePosition {
        /// Robot name.
        robot: String,
        /// Duplicated chain position.
        position: u32,
    },
    /// Runner timeout is zero.
    #[error("runner timeout must be greater than zero minutes")]
    ZeroTimeout,
    /// Runner command is empty.
    #[error("runner command must not be empty")]
    EmptyCommand,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads and validates configuration.
///
/// Resolution order: the explicit `path`, then the `RIG_CONFIG` environment
/// variable, then `rig.toml` in the working directory.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, exceeds the size
/// limit, fails to parse, or fails validation.
pub fn load(path: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    let resolved = match path {
        Some(path) => path.to_path_buf(),
        None => env::var(CONFIG_ENV_VAR).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
    };
    let metadata = fs::metadata(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            size,
            max: MAX_CONFIG_FILE_SIZE,
        });
    }
    let raw = fs::read_to_string(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
    load_from_str(&raw)
}

/// Parses and validates configuration from a TOML string.
///
/// # Errors
///
/// Returns [`ConfigError`] when parsing or validation fails.
pub fn load_from_str(raw: &str) -> Result<HarnessConfig, ConfigError> {
    let config: HarnessConfig =
        toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl HarnessConfig {
    /// Validates the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, agent) in self.agents.iter().enumerate() {
            if self.agents.iter().skip(index + 1).any(|other| other.name == agent.name) {
                return Err(ConfigError::DuplicateAgent(agent.name.clone()));
            }
            if agent.labels.is_empty() {
                return Err(ConfigError::EmptyLabels(agent.name.clone()));
            }
            if agent.labels.iter().any(|label| label.trim().is_empty()) {
                return Err(ConfigError::BlankLabel(agent.name.clone()));
            }
        }

        for robot in &self.robots {
            if !self.agents.iter().any(|agent| agent.name == robot.agent) {
                return Err(ConfigError::UnknownAgent {
                    robot: robot.name.clone(),
                    agent: robot.agent.clone(),
                });
            }
            for (index, device) in robot.chain.iter().enumerate() {
                if robot.chain.iter().skip(index + 1).any(|other| other.position == device.position)
                {
                    return Err(ConfigError::DuplicatePosition {
                        robot: robot.name.clone(),
                        position: device.position,
                    });
                }
            }
        }

        if self.runner.timeout_mins == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.runner.command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        Ok(())
    }

    /// Returns the agent inventory as core agents.
    #[must_use]
    pub fn agent_inventory(&self) -> Vec<Agent> {
        self.agents.iter().map(AgentConfig::to_agent).collect()
    }

    /// Returns the chain of the named robot as core devices.
    #[must_use]
    pub fn robot_chain(&self, robot: &str) -> Option<Vec<Device>> {
        self.robots
            .iter()
            .find(|candidate| candidate.name == robot)
            .map(|robot| robot.chain.iter().map(DeviceConfig::to_device).collect())
    }
}
