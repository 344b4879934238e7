//! Error types for the AffectLink core
//!
//! This module provides the sensor fault type that crosses the
//! [`crate::hal::SensorSource`] boundary. It works in `no_std` environments
//! and carries its context without heap allocation. Driver crates keep their
//! own richer, bus-parameterized error types and map them down to this one
//! at the trait boundary.

use core::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Sensor Faults
// ============================================================================

/// A failed sensor read, as seen by the control loop.
///
/// The loop's response is uniform for all variants: log, count, and skip the
/// sample without touching buffer state. The variants exist so telemetry and
/// logs can distinguish a wiring fault from a transient one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorError {
    /// Bus transfer to the front end failed
    Bus,
    /// Converted value is outside the channel's plausible range
    OutOfRange {
        /// The raw value that was rejected
        raw: u16,
    },
    /// Conversion had not completed when the result was read
    NotReady,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "Sensor bus transfer failed"),
            Self::OutOfRange { raw } => write!(f, "Sample out of range: {raw}"),
            Self::NotReady => write!(f, "Conversion not ready"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SensorError {}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus => defmt::write!(f, "bus fault"),
            Self::OutOfRange { raw } => defmt::write!(f, "out of range: {}", raw),
            Self::NotReady => defmt::write!(f, "not ready"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
