// crates/rig-exec/src/checkout/copy.rs
// ============================================================================
// Module: Rig Exec Copy Checkout
// Description: Source checkout copying a pre-staged directory tree.
// Purpose: Populate target workdirs without network access.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! `CopyCheckout` recursively copies a pre-staged source tree into the target
//! workdir. Each target receives its own copy, so targets never share a
//! source tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use rig_core::interfaces::CheckoutError;
use rig_core::interfaces::SourceCheckout;

// ============================================================================
// SECTION: Copy Checkout
// ============================================================================

/// Recursive directory copy checkout.
#[derive(Debug, Clone)]
pub struct CopyCheckout {
    /// Pre-staged source tree.
    source: PathBuf,
}

impl CopyCheckout {
    /// Creates a checkout copying from `source`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl SourceCheckout for CopyCheckout {
    fn checkout(&self, workdir: &Path) -> Result<(), CheckoutError> {
        if !self.source.is_dir() {
            return Err(CheckoutError::Failed(format!(
                "source tree {} does not exist",
                self.source.display()
            )));
        }
        if workdir.exists() {
            fs::remove_dir_all(workdir).map_err(|err| CheckoutError::Io(err.to_string()))?;
        }
        copy_tree(&self.source, workdir)
    }
}

/// Recursively copies `from` into `to`.
fn copy_tree(from: &Path, to: &Path) -> Result<(), CheckoutError> {
    fs::create_dir_all(to).map_err(|err| CheckoutError::Io(err.to_string()))?;
    let entries = fs::read_dir(from).map_err(|err| CheckoutError::Io(err.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|err| CheckoutError::Io(err.to_string()))?;
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|err| CheckoutError::Io(err.to_string()))?;
        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|err| CheckoutError::Io(err.to_string()))?;
        }
    }
    Ok(())
}
