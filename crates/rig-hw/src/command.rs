// crates/rig-hw/src/command.rs
// ============================================================================
// Module: Rig Hardware Device Commands
// Description: Named device commands issued over the hardware link.
// Purpose: Give scenarios a stable command vocabulary.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Device commands are long-running procedures executed on a servo node
//! (offset measurement, phase order detection, parameter measurement). The
//! link reports their final [`rig_core::CommandStatus`]; the command names
//! here are the stable wire vocabulary shared by scenarios and links.

// ============================================================================
// SECTION: Command Kinds
// ============================================================================

/// Procedures a servo node can run on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCommandKind {
    /// Commutation offset measurement.
    CommutationOffsetMeasurement,
    /// Motor phase order detection.
    PhaseOrderDetection,
    /// Open phase detection.
    OpenPhaseDetection,
    /// Pole pair detection.
    PolePairDetection,
    /// Phase resistance measurement.
    PhaseResistanceMeasurement,
    /// Phase inductance measurement.
    PhaseInductanceMeasurement,
    /// Torque constant measurement.
    TorqueConstantMeasurement,
    /// Firmware flash.
    FlashFirmware,
}

impl DeviceCommandKind {
    /// Returns the stable command name sent over the link.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CommutationOffsetMeasurement => "commutation_offset_measurement",
            Self::PhaseOrderDetection => "phase_order_detection",
            Self::OpenPhaseDetection => "open_phase_detection",
            Self::PolePairDetection => "pole_pair_detection",
            Self::PhaseResistanceMeasurement => "phase_resistance_measurement",
            Self::PhaseInductanceMeasurement => "phase_inductance_measurement",
            Self::TorqueConstantMeasurement => "torque_constant_measurement",
            Self::FlashFirmware => "flash_firmware",
        }
    }
}

impl std::fmt::Display for DeviceCommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
