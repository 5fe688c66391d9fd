// crates/rig-core/src/runtime/session.rs
// ============================================================================
// Module: Rig Harness Session Engine
// Description: Test-session lifecycle with phase-gated scenarios.
// Purpose: Run scenarios through setup, execution, and guaranteed teardown.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! A session discovers devices exactly once, applies the selection filter,
//! and runs each scenario through the three-phase machine: setup strictly
//! precedes execution strictly precedes teardown. Teardown always runs and
//! is exhaustive; a terminal teardown action does not stop later teardown
//! actions. Device-dependent scenarios skip (never fail) on an empty device
//! set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use thiserror::Error;

use crate::core::ActionFailure;
use crate::core::Clock;
use crate::core::Device;
use crate::core::FilterError;
use crate::core::Phase;
use crate::core::ScenarioId;
use crate::core::ScenarioResult;
use crate::core::ScenarioStatus;
use crate::core::SelectionFilter;
use crate::core::SessionId;
use crate::core::SessionReport;
use crate::core::Timestamp;
use crate::interfaces::HardwareLink;
use crate::interfaces::LinkError;
use crate::interfaces::PowerSupply;
use crate::interfaces::PsuError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of log lines retained per scenario result.
pub const DEFAULT_LOG_TAIL_LINES: usize = 50;

/// Action name recorded for the pre-scenario fault sweep.
const FAULT_SWEEP_ACTION: &str = "fault_sweep";

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Outcome of one scenario action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Action succeeded.
    Pass,
    /// Action failed in a recoverable way (e.g. a measurement out of
    /// tolerance); the phase continues.
    Fail(String),
    /// Action signaled the environment itself is unusable; the current phase
    /// stops, teardown still runs.
    Fatal(String),
}

/// One precondition, test, or cleanup action within a scenario.
pub trait ScenarioAction {
    /// Stable action name used in failure records.
    fn name(&self) -> &str;

    /// Runs the action against the session context.
    fn run(&self, ctx: &mut SessionContext<'_>) -> ActionOutcome;
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// One acceptance test scenario: ordered setup, execution, and teardown
/// action lists plus gating flags.
pub struct Scenario {
    /// Scenario identifier.
    pub scenario_id: ScenarioId,
    /// Skip (never fail) when the filtered device set is empty.
    pub needs_devices: bool,
    /// Skip unless firmware flashing was requested for the session.
    pub flash_gated: bool,
    /// Order this scenario before unflagged scenarios.
    pub run_first: bool,
    /// Precondition actions.
    pub setup: Vec<Box<dyn ScenarioAction>>,
    /// Test actions; run only when every setup action passed.
    pub execution: Vec<Box<dyn ScenarioAction>>,
    /// Cleanup actions; always attempted, never short-circuited.
    pub teardown: Vec<Box<dyn ScenarioAction>>,
}

impl Scenario {
    /// Creates an empty scenario with default gating.
    #[must_use]
    pub fn new(scenario_id: impl Into<ScenarioId>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            needs_devices: false,
            flash_gated: false,
            run_first: false,
            setup: Vec::new(),
            execution: Vec::new(),
            teardown: Vec::new(),
        }
    }
}

// ============================================================================
// SECTION: Session Context
// ============================================================================

/// Bounded scenario log buffer; retains the tail of appended lines.
#[derive(Debug)]
pub struct LogBuffer {
    /// Retained lines, oldest first.
    lines: VecDeque<String>,
    /// Maximum number of retained lines.
    limit: usize,
}

impl LogBuffer {
    /// Creates a buffer retaining at most `limit` lines.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            limit,
        }
    }

    /// Appends a line, evicting the oldest when over the limit.
    pub fn push(&mut self, line: impl Into<String>) {
        if self.limit == 0 {
            return;
        }
        if self.lines.len() == self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Returns the retained tail, oldest first.
    #[must_use]
    pub fn tail(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

/// Per-scenario context handed to actions.
pub struct SessionContext<'a> {
    /// Devices selected for this session, after filtering.
    devices: &'a [Device],
    /// Hardware link for device commands.
    link: &'a dyn HardwareLink,
    /// Scenario log buffer.
    log: &'a mut LogBuffer,
}

impl<'a> SessionContext<'a> {
    /// Returns the filtered device list.
    #[must_use]
    pub const fn devices(&self) -> &'a [Device] {
        self.devices
    }

    /// Returns the hardware link.
    #[must_use]
    pub const fn link(&self) -> &'a dyn HardwareLink {
        self.link
    }

    /// Appends a line to the scenario log.
    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }
}

// ============================================================================
// SECTION: Session Options
// ============================================================================

/// Session configuration resolved from the CLI surface.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Session identifier.
    pub session_id: SessionId,
    /// Substring filter on scenario identifiers (`-k`).
    pub name_filter: Option<String>,
    /// Device selection filter (`--inc`/`--exc`).
    pub filter: SelectionFilter,
    /// Remote-control the power supply around the session (`--control-psu`).
    pub control_psu: bool,
    /// Run firmware-flash scenarios (`--flash-fw`).
    pub flash_firmware: bool,
    /// Log lines retained per scenario result.
    pub log_tail_lines: usize,
}

impl SessionOptions {
    /// Creates options with defaults for the given session identifier.
    #[must_use]
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            name_filter: None,
            filter: SelectionFilter::All,
            control_psu: false,
            flash_firmware: false,
            log_tail_lines: DEFAULT_LOG_TAIL_LINES,
        }
    }
}

// ============================================================================
// SECTION: Session Runner
// ============================================================================

/// Session lifecycle errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Device discovery failed at session start.
    #[error("session discovery failed: {0}")]
    Discovery(#[from] LinkError),
    /// Selection filter was invalid for the discovered chain.
    #[error("selection filter rejected: {0}")]
    Filter(#[from] FilterError),
    /// Power supply control failed at session start.
    #[error("power supply control failed: {0}")]
    Psu(#[from] PsuError),
}

/// Runs scenarios through the session lifecycle.
pub struct SessionRunner<'a> {
    /// Hardware link for discovery and device commands.
    link: &'a dyn HardwareLink,
    /// Optional power supply, used only with `control_psu`.
    psu: Option<&'a dyn PowerSupply>,
    /// Timestamp source.
    clock: &'a dyn Clock,
    /// Session options.
    options: SessionOptions,
}

impl<'a> SessionRunner<'a> {
    /// Creates a session runner.
    #[must_use]
    pub const fn new(
        link: &'a dyn HardwareLink,
        psu: Option<&'a dyn PowerSupply>,
        clock: &'a dyn Clock,
        options: SessionOptions,
    ) -> Self {
        Self {
            link,
            psu,
            clock,
            options,
        }
    }

    /// Runs the session: power gating, one-time discovery, filtering, and the
    /// scenario phase machine.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session cannot start at all (power
    /// supply, discovery, or filter rejection). Scenario failures are not
    /// errors; they are recorded in the report.
    pub fn run(&self, scenarios: Vec<Scenario>) -> Result<SessionReport, SessionError> {
        if self.options.control_psu
            && let Some(psu) = self.psu
        {
            tracing::info!(session = %self.options.session_id, "powering on supply");
            psu.power_on()?;
        }

        let outcome = self.run_inner(scenarios);

        // Power-off sits in a guaranteed-run position relative to the session.
        if self.options.control_psu
            && let Some(psu) = self.psu
        {
            tracing::info!(session = %self.options.session_id, "powering off supply");
            if let Err(err) = psu.power_off() {
                tracing::warn!(session = %self.options.session_id, error = %err, "power-off failed");
            }
        }

        outcome
    }

    /// Discovers devices, filters, orders, and runs the scenario list.
    fn run_inner(&self, mut scenarios: Vec<Scenario>) -> Result<SessionReport, SessionError> {
        let discovered = self.link.discover()?;
        tracing::debug!(session = %self.options.session_id, count = discovered.len(), "discovered devices");
        let devices = self.options.filter.apply(&discovered)?;

        if let Some(filter) = &self.options.name_filter {
            scenarios.retain(|scenario| scenario.scenario_id.as_str().contains(filter.as_str()));
        }
        if scenarios.is_empty() {
            return Ok(SessionReport {
                session_id: self.options.session_id.clone(),
                results: Vec::new(),
                no_tests_collected: true,
            });
        }

        // Stable sort: flagged scenarios first, declaration order otherwise.
        scenarios.sort_by_key(|scenario| !scenario.run_first);

        let results = scenarios
            .iter()
            .map(|scenario| self.run_scenario(scenario, &devices))
            .collect();

        Ok(SessionReport {
            session_id: self.options.session_id.clone(),
            results,
            no_tests_collected: false,
        })
    }

    /// Runs one scenario through the three-phase machine.
    fn run_scenario(&self, scenario: &Scenario, devices: &[Device]) -> ScenarioResult {
        let started = self.clock.now();

        if scenario.flash_gated && !self.options.flash_firmware {
            return self.skipped(scenario, started, "firmware flashing not requested");
        }
        if scenario.needs_devices && devices.is_empty() {
            return self.skipped(scenario, started, "need at least one device on the network");
        }

        let mut failures = Vec::new();
        let mut log = LogBuffer::new(self.options.log_tail_lines);
        let mut advance = self.fault_sweep(devices, &mut failures);

        let mut ctx = SessionContext {
            devices,
            link: self.link,
            log: &mut log,
        };

        if advance {
            tracing::debug!(scenario = %scenario.scenario_id, "setup phase");
            for action in &scenario.setup {
                match action.run(&mut ctx) {
                    ActionOutcome::Pass => {}
                    ActionOutcome::Fail(message) => {
                        failures.push(failure(Phase::Setup, action.name(), message, false));
                        advance = false;
                    }
                    ActionOutcome::Fatal(message) => {
                        failures.push(failure(Phase::Setup, action.name(), message, true));
                        advance = false;
                        break;
                    }
                }
            }
        }

        if advance {
            tracing::debug!(scenario = %scenario.scenario_id, "execution phase");
            for action in &scenario.execution {
                match action.run(&mut ctx) {
                    ActionOutcome::Pass => {}
                    ActionOutcome::Fail(message) => {
                        failures.push(failure(Phase::Execution, action.name(), message, false));
                    }
                    ActionOutcome::Fatal(message) => {
                        failures.push(failure(Phase::Execution, action.name(), message, true));
                        break;
                    }
                }
            }
        }

        // Teardown always runs and never short-circuits.
        tracing::debug!(scenario = %scenario.scenario_id, "teardown phase");
        for action in &scenario.teardown {
            match action.run(&mut ctx) {
                ActionOutcome::Pass => {}
                ActionOutcome::Fail(message) => {
                    tracing::warn!(scenario = %scenario.scenario_id, action = action.name(), %message, "teardown failure");
                    failures.push(failure(Phase::Teardown, action.name(), message, false));
                }
                ActionOutcome::Fatal(message) => {
                    tracing::warn!(scenario = %scenario.scenario_id, action = action.name(), %message, "terminal teardown failure");
                    failures.push(failure(Phase::Teardown, action.name(), message, true));
                }
            }
        }

        let status = if failures.is_empty() {
            ScenarioStatus::Passed
        } else {
            ScenarioStatus::Failed
        };

        ScenarioResult {
            scenario_id: scenario.scenario_id.clone(),
            status,
            failures,
            skip_reason: None,
            log_tail: log.tail(),
            started,
            finished: self.clock.now(),
        }
    }

    /// Resets faults on every non-safety device before the scenario runs.
    ///
    /// Returns whether the sweep left the environment fit for setup.
    fn fault_sweep(&self, devices: &[Device], failures: &mut Vec<ActionFailure>) -> bool {
        for device in devices {
            if device.is_safety_module() {
                continue;
            }
            if let Err(err) = self.link.fault_reset(device.address) {
                let terminal = err.is_terminal();
                failures.push(failure(
                    Phase::Setup,
                    FAULT_SWEEP_ACTION,
                    format!("fault reset failed on device {}: {err}", device.address),
                    terminal,
                ));
                return false;
            }
        }
        true
    }

    /// Builds a skipped result with the given reason.
    fn skipped(&self, scenario: &Scenario, started: Timestamp, reason: &str) -> ScenarioResult {
        tracing::debug!(scenario = %scenario.scenario_id, reason, "scenario skipped");
        ScenarioResult {
            scenario_id: scenario.scenario_id.clone(),
            status: ScenarioStatus::Skipped,
            failures: Vec::new(),
            skip_reason: Some(reason.to_string()),
            log_tail: Vec::new(),
            started,
            finished: self.clock.now(),
        }
    }
}

/// Builds one action failure record.
fn failure(phase: Phase, action: &str, message: String, terminal: bool) -> ActionFailure {
    ActionFailure {
        phase,
        action: action.to_string(),
        message,
        terminal,
    }
}
