// crates/rig-exec/src/checkout/git.rs
// ============================================================================
// Module: Rig Exec Git Checkout
// Description: Source checkout backed by the git CLI.
// Purpose: Clone the test source into a target workdir.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! `GitCheckout` produces a fresh shallow clone per run target. An existing
//! workdir is removed first so every iteration starts from a clean tree; no
//! state is shared between targets. Authentication relies on the ambient git
//! credential configuration; the harness never handles token values itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use rig_core::interfaces::CheckoutError;
use rig_core::interfaces::SourceCheckout;

// ============================================================================
// SECTION: Git Checkout
// ============================================================================

/// Shallow git clone checkout.
#[derive(Debug, Clone)]
pub struct GitCheckout {
    /// Repository URL.
    repository: String,
    /// Optional branch or tag.
    reference: Option<String>,
    /// Git binary path.
    binary: PathBuf,
}

impl GitCheckout {
    /// Creates a checkout for the repository's default branch.
    #[must_use]
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            reference: None,
            binary: PathBuf::from("git"),
        }
    }

    /// Selects a branch or tag to clone.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Overrides the git binary path.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl SourceCheckout for GitCheckout {
    fn checkout(&self, workdir: &Path) -> Result<(), CheckoutError> {
        if workdir.exists() {
            fs::remove_dir_all(workdir).map_err(|err| CheckoutError::Io(err.to_string()))?;
        }
        if let Some(parent) = workdir.parent() {
            fs::create_dir_all(parent).map_err(|err| CheckoutError::Io(err.to_string()))?;
        }

        let mut invocation = Command::new(&self.binary);
        invocation.arg("clone").arg("--depth").arg("1");
        if let Some(reference) = &self.reference {
            invocation.arg("--branch").arg(reference);
        }
        invocation.arg(&self.repository).arg(workdir);
        invocation.stdin(Stdio::null());

        tracing::debug!(workdir = %workdir.display(), "cloning test source");
        let output = invocation
            .output()
            .map_err(|err| CheckoutError::Failed(format!("git clone: {err}")))?;
        if !output.status.success() {
            return Err(CheckoutError::Failed(format!(
                "git clone exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}
