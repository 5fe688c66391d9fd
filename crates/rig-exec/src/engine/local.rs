// crates/rig-exec/src/engine/local.rs
// ============================================================================
// Module: Rig Exec Local Engine
// Description: Process-based engine for agents without a container runtime.
// Purpose: Run test commands directly in the target workdir.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! `LocalEngine` runs the test command as a child process in the target
//! workdir. Stop requests are honored cooperatively: `start` polls the child
//! and kills it once the target's name lands in the stop set, so the global
//! dispatch timeout can terminate in-flight runs from another task. `stop` on
//! an unknown or already-finished name succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;
use std::process::Stdio;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rig_core::TargetId;
use rig_core::interfaces::ContainerEngine;
use rig_core::interfaces::EngineError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Poll interval while waiting for the child process.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// SECTION: Local Engine
// ============================================================================

/// Engine running test commands as local child processes.
#[derive(Debug, Default)]
pub struct LocalEngine {
    /// Targets with a pending stop request.
    stop_requested: Mutex<HashSet<TargetId>>,
}

impl LocalEngine {
    /// Creates a local engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a stop was requested for `name` and clears it.
    fn take_stop_request(&self, name: &TargetId) -> bool {
        self.stop_requested.lock().map(|mut requested| requested.remove(name)).unwrap_or(false)
    }
}

impl ContainerEngine for LocalEngine {
    fn start(
        &self,
        command: &[String],
        workdir: &Path,
        name: &TargetId,
    ) -> Result<i32, EngineError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| EngineError::StartFailed("empty command".to_string()))?;

        // Drop any stop request left over from a previous run of this name.
        self.take_stop_request(name);

        let mut child = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|err| EngineError::StartFailed(format!("{program}: {err}")))?;

        tracing::debug!(target = %name, %program, "started local process");
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status.code().unwrap_or(-1)),
                Ok(None) => {
                    if self.take_stop_request(name) {
                        tracing::debug!(target = %name, "killing local process on stop request");
                        if let Err(err) = child.kill() {
                            return Err(EngineError::StopFailed(err.to_string()));
                        }
                        let status = child
                            .wait()
                            .map_err(|err| EngineError::StopFailed(err.to_string()))?;
                        return Ok(status.code().unwrap_or(-1));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(err) => return Err(EngineError::StartFailed(err.to_string())),
            }
        }
    }

    fn stop(&self, name: &TargetId) -> Result<(), EngineError> {
        // Stopping an unknown or finished target is a successful release.
        if let Ok(mut requested) = self.stop_requested.lock() {
            requested.insert(name.clone());
        }
        Ok(())
    }
}
