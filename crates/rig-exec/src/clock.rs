// crates/rig-exec/src/clock.rs
// ============================================================================
// Module: Rig Exec System Clock
// Description: Wall-clock timestamp source for hosted runs.
// Purpose: Supply unix-millisecond timestamps to the session engine.
// Dependencies: rig-core, std
// ============================================================================

//! ## Overview
//! The core engine never reads wall-clock time; hosts inject it. This is the
//! host-side clock used by real dispatch and session runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rig_core::Clock;
use rig_core::Timestamp;

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Wall-clock timestamp source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Timestamp::UnixMillis(millis)
    }
}
