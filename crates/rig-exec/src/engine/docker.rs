// crates/rig-exec/src/engine/docker.rs
// ============================================================================
// Module: Rig Exec Docker Engine
// Description: Container engine backed by the docker CLI.
// Purpose: Run test commands in throwaway containers.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! `DockerEngine` runs each target in a named, auto-removed container with
//! the target workdir bind-mounted. Credentials travel only as environment
//! passthrough names (`-e VAR` without a value), so secret values never
//! appear on the command line, in logs, or in result artifacts. `stop` force-
//! removes the named container and treats an already-gone container as
//! success, which makes it idempotent under repeated-call-after-failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use rig_core::TargetId;
use rig_core::interfaces::ContainerEngine;
use rig_core::interfaces::EngineError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Workdir mount point inside the container.
const CONTAINER_WORKDIR: &str = "/work";

// ============================================================================
// SECTION: Docker Engine
// ============================================================================

/// Container engine shelling out to the docker CLI.
#[derive(Debug, Clone)]
pub struct DockerEngine {
    /// Image every target runs in.
    image: String,
    /// Docker binary path.
    binary: PathBuf,
    /// Environment variable names passed through into the container.
    env_passthrough: Vec<String>,
}

impl DockerEngine {
    /// Creates an engine running the given image.
    #[must_use]
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            binary: PathBuf::from("docker"),
            env_passthrough: Vec::new(),
        }
    }

    /// Overrides the docker binary path.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Passes the named environment variables through into the container.
    ///
    /// Only the names are placed on the command line; docker resolves the
    /// values from the dispatcher's environment.
    #[must_use]
    pub fn with_env_passthrough(mut self, names: Vec<String>) -> Self {
        self.env_passthrough = names;
        self
    }
}

impl ContainerEngine for DockerEngine {
    fn start(
        &self,
        command: &[String],
        workdir: &Path,
        name: &TargetId,
    ) -> Result<i32, EngineError> {
        let mut invocation = Command::new(&self.binary);
        invocation
            .arg("run")
            .arg("--rm")
            .arg("--name")
            .arg(name.as_str())
            .arg("-v")
            .arg(format!("{}:{CONTAINER_WORKDIR}", workdir.display()))
            .arg("-w")
            .arg(CONTAINER_WORKDIR);
        for variable in &self.env_passthrough {
            invocation.arg("-e").arg(variable);
        }
        invocation.arg(&self.image).args(command);
        invocation.stdin(Stdio::null());

        tracing::debug!(container = %name, image = %self.image, "starting container");
        let status = invocation
            .status()
            .map_err(|err| EngineError::StartFailed(format!("docker run: {err}")))?;
        Ok(status.code().unwrap_or(-1))
    }

    fn stop(&self, name: &TargetId) -> Result<(), EngineError> {
        let output = Command::new(&self.binary)
            .arg("rm")
            .arg("-f")
            .arg(name.as_str())
            .stdin(Stdio::null())
            .output()
            .map_err(|err| EngineError::StopFailed(format!("docker rm: {err}")))?;
        // A container that no longer exists is a successful release.
        if !output.status.success() {
            tracing::debug!(container = %name, "container already released");
        }
        Ok(())
    }
}
