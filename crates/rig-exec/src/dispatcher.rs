// crates/rig-exec/src/dispatcher.rs
// ============================================================================
// Module: Rig Exec Parallel Dispatcher
// Description: Parallel dispatch across agents with a global timeout.
// Purpose: Run one blocking task per target and bound the whole dispatch.
// Dependencies: rig-core, tokio
// ============================================================================

//! ## Overview
//! The dispatcher runs one blocking task per run target, so targets execute
//! in parallel across agents while each agent's session stays sequential
//! inside its own environment. A global timeout bounds the entire dispatch:
//! when it fires, every in-flight target is stopped through the engine's
//! idempotent release and recorded as timed out. Targets share no mutable
//! state; per-target failures are already absorbed by the core dispatch loop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use rig_core::DispatchReport;
use rig_core::RunTarget;
use rig_core::TargetOutcome;
use rig_core::interfaces::ContainerEngine;
use rig_core::interfaces::SourceCheckout;
use rig_core::runtime::run_target;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio::time::timeout_at;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default global dispatch timeout.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(120 * 60);

// ============================================================================
// SECTION: Parallel Dispatcher
// ============================================================================

/// Parallel dispatcher over a shared engine and checkout.
pub struct ParallelDispatcher {
    /// Container engine shared by all targets.
    engine: Arc<dyn ContainerEngine>,
    /// Source checkout shared by all targets.
    checkout: Arc<dyn SourceCheckout>,
    /// Global dispatch timeout.
    timeout: Duration,
}

impl ParallelDispatcher {
    /// Creates a dispatcher with the default global timeout.
    #[must_use]
    pub fn new(engine: Arc<dyn ContainerEngine>, checkout: Arc<dyn SourceCheckout>) -> Self {
        Self {
            engine,
            checkout,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Overrides the global dispatch timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dispatches every target, in parallel, bounded by the global timeout.
    ///
    /// Zero targets completes immediately with an empty, successful report.
    pub async fn dispatch_all(&self, targets: Vec<RunTarget>) -> DispatchReport {
        let deadline = Instant::now() + self.timeout;
        let mut tasks = JoinSet::new();
        for target in &targets {
            let engine = Arc::clone(&self.engine);
            let checkout = Arc::clone(&self.checkout);
            let target = target.clone();
            tasks.spawn_blocking(move || run_target(engine.as_ref(), checkout.as_ref(), &target));
        }

        let mut report = DispatchReport::default();
        loop {
            match timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(target_report))) => report.targets.push(target_report),
                Ok(Some(Err(join_error))) => {
                    tracing::error!(error = %join_error, "run target task failed to join");
                }
                Ok(None) => break,
                Err(_) => {
                    report.timed_out = true;
                    tracing::error!(
                        timeout_secs = self.timeout.as_secs(),
                        "global dispatch timeout; stopping in-flight targets"
                    );
                    // Stop is idempotent, so releasing already-finished
                    // targets again is harmless.
                    for target in &targets {
                        if let Err(err) = self.engine.stop(target.container_name()) {
                            tracing::warn!(target = %target.target_id, error = %err, "stop after timeout failed");
                        }
                    }
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok(mut target_report) = joined {
                            target_report.outcome = TargetOutcome::TimedOut;
                            report.targets.push(target_report);
                        }
                    }
                    break;
                }
            }
        }
        report
    }
}
