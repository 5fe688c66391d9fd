// crates/rig-core/src/core/filter.rs
// ============================================================================
// Module: Rig Harness Selection Filters
// Description: Chain-position include/exclude filters for device selection.
// Purpose: Parse and apply `--inc`/`--exc` position specifications.
// Dependencies: crate::core::device, serde, thiserror
// ============================================================================

//! ## Overview
//! Selection filters restrict which chain positions a scenario iterates over.
//! A position specification is a single index (`"2"`), a comma-separated list
//! (`"1,2,4"`), or a dash-delimited inclusive range (`"1-4"`). Filters affect
//! device selection only; they never change scenario pass/fail semantics.
//! Passing include and exclude together is a configuration error: the filters
//! have no defined precedence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::device::Device;

// ============================================================================
// SECTION: Position Specification
// ============================================================================

/// Ordered set of chain positions named by a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionSpec {
    /// Requested chain positions in ascending order.
    positions: BTreeSet<u32>,
}

impl PositionSpec {
    /// Parses a position specification.
    ///
    /// Accepted forms: a single index (`"2"`), a comma-separated list
    /// (`"1,2,4"`), or a dash-delimited inclusive range (`"1-4"`).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the expression is empty, mixes list and
    /// range syntax, contains a non-numeric index, or names an inverted range.
    pub fn parse(expression: &str) -> Result<Self, FilterError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(FilterError::EmptyExpression);
        }
        if trimmed.contains(',') && trimmed.contains('-') {
            return Err(FilterError::MixedSyntax(trimmed.to_string()));
        }

        let mut positions = BTreeSet::new();
        if trimmed.contains(',') {
            for part in trimmed.split(',') {
                positions.insert(parse_index(part)?);
            }
        } else if trimmed.contains('-') {
            let (start, end) = parse_range(trimmed)?;
            for position in start..=end {
                positions.insert(position);
            }
        } else {
            positions.insert(parse_index(trimmed)?);
        }

        Ok(Self {
            positions,
        })
    }

    /// Returns whether the specification names the given position.
    #[must_use]
    pub fn contains(&self, position: u32) -> bool {
        self.positions.contains(&position)
    }

    /// Returns the largest named position.
    #[must_use]
    pub fn max(&self) -> Option<u32> {
        self.positions.iter().next_back().copied()
    }

    /// Returns the named positions in ascending order.
    #[must_use]
    pub fn positions(&self) -> Vec<u32> {
        self.positions.iter().copied().collect()
    }
}

/// Parses one index component of a position specification.
fn parse_index(part: &str) -> Result<u32, FilterError> {
    part.trim()
        .parse::<u32>()
        .map_err(|_| FilterError::InvalidIndex(part.trim().to_string()))
}

/// Parses a dash-delimited inclusive range.
fn parse_range(expression: &str) -> Result<(u32, u32), FilterError> {
    let mut parts = expression.splitn(2, '-');
    let start = parts.next().unwrap_or_default();
    let end = parts.next().unwrap_or_default();
    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(FilterError::InvalidRange(expression.to_string()));
    }
    let start = parse_index(start)?;
    let end = parse_index(end)?;
    if start > end {
        return Err(FilterError::InvalidRange(expression.to_string()));
    }
    Ok((start, end))
}

// ============================================================================
// SECTION: Selection Filter
// ============================================================================

/// Device selection filter applied to a discovered chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "positions", rename_all = "snake_case")]
pub enum SelectionFilter {
    /// All discovered devices.
    All,
    /// Only the named chain positions.
    Include(PositionSpec),
    /// All chain positions except the named ones.
    Exclude(PositionSpec),
}

impl SelectionFilter {
    /// Builds a filter from optional include and exclude expressions.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::IncludeExcludeConflict`] when both expressions
    /// are present, or a parse error from [`PositionSpec::parse`].
    pub fn from_expressions(
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<Self, FilterError> {
        match (include, exclude) {
            (Some(_), Some(_)) => Err(FilterError::IncludeExcludeConflict),
            (Some(expression), None) => Ok(Self::Include(PositionSpec::parse(expression)?)),
            (None, Some(expression)) => Ok(Self::Exclude(PositionSpec::parse(expression)?)),
            (None, None) => Ok(Self::All),
        }
    }

    /// Applies the filter to a discovered device list.
    ///
    /// Devices are matched by chain position, not by discovery index, and the
    /// discovery order of surviving devices is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyDeviceList`] when a positional filter is
    /// applied to an empty chain, or [`FilterError::PositionOutOfRange`] when
    /// a named position exceeds the valid range for the chain.
    pub fn apply(&self, devices: &[Device]) -> Result<Vec<Device>, FilterError> {
        let spec = match self {
            Self::All => return Ok(devices.to_vec()),
            Self::Include(spec) | Self::Exclude(spec) => spec,
        };

        if devices.is_empty() {
            return Err(FilterError::EmptyDeviceList);
        }
        let max_valid = u32::try_from(devices.len() - 1)
            .map_err(|_| FilterError::EmptyDeviceList)?;
        if let Some(requested) = spec.max()
            && requested > max_valid
        {
            return Err(FilterError::PositionOutOfRange {
                requested,
                max: max_valid,
            });
        }

        let selected = devices
            .iter()
            .filter(|device| {
                let named = spec.contains(device.position.value());
                match self {
                    Self::All => true,
                    Self::Include(_) => named,
                    Self::Exclude(_) => !named,
                }
            })
            .cloned()
            .collect();
        Ok(selected)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Selection filter errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Include and exclude were both specified.
    #[error("--inc and --exc are mutually exclusive; specify at most one")]
    IncludeExcludeConflict,
    /// Position expression was empty.
    #[error("position expression is empty")]
    EmptyExpression,
    /// Position expression mixed list and range syntax.
    #[error("position expression mixes list and range syntax: {0}")]
    MixedSyntax(String),
    /// Position index was not a non-negative integer.
    #[error("invalid position index: {0}")]
    InvalidIndex(String),
    /// Range was open-ended or inverted.
    #[error("invalid position range: {0}")]
    InvalidRange(String),
    /// Positional filter applied to an empty chain.
    #[error("device list is empty")]
    EmptyDeviceList,
    /// Named position exceeds the chain's valid range.
    #[error(
        "position {requested} is out of range for the connected devices; \
         specify a position within the range 0-{max}"
    )]
    PositionOutOfRange {
        /// Largest requested position.
        requested: u32,
        /// Largest valid position for the chain.
        max: u32,
    },
}
