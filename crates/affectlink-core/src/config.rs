//! Sample rates, window sizes, and controller configuration
//!
//! The ring capacities are compile-time constants (window duration times
//! sample rate) so the buffers can live in plain arrays with no allocation.
//! Everything else about the control loop is runtime configuration with
//! defaults matching the device's nominal rates.

use serde::{Deserialize, Serialize};

use crate::types::Baseline;

/// Statistics window duration in seconds
pub const WINDOW_SECS: u32 = 60;

/// Nominal heart-rate sampling rate in Hz
pub const HR_SAMPLE_RATE_HZ: u32 = 50;

/// Nominal GSR sampling rate in Hz
pub const GSR_SAMPLE_RATE_HZ: u32 = 200;

/// Heart-rate ring capacity: one full window of samples (3000)
pub const HR_WINDOW_SAMPLES: usize = (WINDOW_SECS * HR_SAMPLE_RATE_HZ) as usize;

/// GSR ring capacity: one full window of samples (12000)
pub const GSR_WINDOW_SAMPLES: usize = (WINDOW_SECS * GSR_SAMPLE_RATE_HZ) as usize;

/// Heart-rate acquisition period in milliseconds (20 ms ≈ 50 Hz)
pub const HR_SAMPLE_PERIOD_MS: u64 = 1000 / HR_SAMPLE_RATE_HZ as u64;

/// GSR acquisition period in milliseconds (5 ms ≈ 200 Hz)
pub const GSR_SAMPLE_PERIOD_MS: u64 = 1000 / GSR_SAMPLE_RATE_HZ as u64;

/// Statistics/classification cycle period in milliseconds (one minute)
pub const CYCLE_PERIOD_MS: u64 = WINDOW_SECS as u64 * 1000;

/// Consecutive cycles a category must hold to complete a valid period
pub const DEFAULT_VALID_PERIOD_CYCLES: u32 = 15;

/// Runtime configuration for an [`crate::AffectController`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Heart-rate acquisition period (ms)
    pub heart_period_ms: u64,
    /// GSR acquisition period (ms)
    pub gsr_period_ms: u64,
    /// Statistics/classification cycle period (ms)
    pub cycle_period_ms: u64,
    /// Sustained-tier sigma coefficient
    pub sustained_sigma: f32,
    /// Immediate-tier sigma coefficient
    pub immediate_sigma: f32,
    /// Consecutive cycles required for a valid period
    pub valid_period_cycles: u32,
    /// Resting baseline the classifier compares against
    pub baseline: Baseline,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            heart_period_ms: HR_SAMPLE_PERIOD_MS,
            gsr_period_ms: GSR_SAMPLE_PERIOD_MS,
            cycle_period_ms: CYCLE_PERIOD_MS,
            sustained_sigma: 1.0,
            immediate_sigma: 2.0,
            valid_period_cycles: DEFAULT_VALID_PERIOD_CYCLES,
            baseline: Baseline::resting(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_capacities() {
        assert_eq!(HR_WINDOW_SAMPLES, 3000);
        assert_eq!(GSR_WINDOW_SAMPLES, 12000);
    }

    #[test]
    fn test_cadence_periods() {
        assert_eq!(HR_SAMPLE_PERIOD_MS, 20);
        assert_eq!(GSR_SAMPLE_PERIOD_MS, 5);
        assert_eq!(CYCLE_PERIOD_MS, 60_000);
    }

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.valid_period_cycles, 15);
        assert!((config.sustained_sigma - 1.0).abs() < f32::EPSILON);
        assert!((config.immediate_sigma - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.baseline, Baseline::resting());
    }
}
