// crates/rig-core/src/core/time.rs
// ============================================================================
// Module: Rig Harness Time Model
// Description: Canonical timestamp representations for session records.
// Purpose: Provide deterministic, replayable time values across harness records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The harness uses explicit time values embedded in session and dispatch
//! records to keep replay deterministic. The session engine never reads
//! wall-clock time directly; hosts must supply timestamps via a [`Clock`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in harness records.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Timestamp source injected into the session engine.
pub trait Clock {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Logical clock that increments on every read.
///
/// # Invariants
/// - Produced timestamps are strictly monotonic within one clock instance.
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Next logical tick handed out by the clock.
    next: std::cell::Cell<u64>,
}

impl LogicalClock {
    /// Creates a logical clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        let tick = self.next.get();
        self.next.set(tick.saturating_add(1));
        Timestamp::Logical(tick)
    }
}
