//! Core types for the AffectLink classification engine
//!
//! This module provides the fundamental types shared by every tier of the
//! system:
//! - The closed set of emotional states the classifier can produce
//! - Per-channel statistics (mean / population standard deviation)
//! - The per-cycle statistics pair for both signal channels
//! - The resting baseline the classifier compares against

use serde::{Deserialize, Serialize};

use crate::math;

// ============================================================================
// Emotional State
// ============================================================================

/// Emotional state derived from heart-rate and GSR statistics.
///
/// The mapping from per-channel elevation flags is fixed:
///
/// | heart high | GSR high | state   |
/// |------------|----------|---------|
/// | yes        | yes      | Tension |
/// | yes        | no       | Joy     |
/// | no         | any      | Neutral |
///
/// The state is kept as an enum everywhere inside the core; text forms are
/// produced only at the telemetry boundary via [`AffectState::as_str`] and
/// the alert constructors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum AffectState {
    /// No sustained elevation on the heart-rate channel
    #[default]
    Neutral = 0,
    /// Elevated heart rate without elevated skin conductance
    Joy = 1,
    /// Elevated heart rate together with elevated skin conductance
    Tension = 2,
}

impl AffectState {
    /// All states, in ascending discriminant order
    pub const ALL: [Self; 3] = [Self::Neutral, Self::Joy, Self::Tension];

    /// Text form written to the state characteristic
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::Joy => "Joy",
            Self::Tension => "Tension",
        }
    }

    /// Check whether this is the neutral state
    #[inline]
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Alert text for a completed valid period of this state.
    ///
    /// Returns `None` for [`AffectState::Neutral`]; only the two tracked
    /// categories can complete a valid period.
    #[inline]
    #[must_use]
    pub const fn valid_period_alert(self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Joy => Some("Valid Joy Period Detected"),
            Self::Tension => Some("Valid Tension Period Detected"),
        }
    }

    /// Alert text for an immediate-tier trigger of this state.
    ///
    /// Returns `None` for [`AffectState::Neutral`]; the immediate tier never
    /// alerts on a return to neutral.
    #[inline]
    #[must_use]
    pub const fn immediate_alert(self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Joy => Some("Alert: Joy"),
            Self::Tension => Some("Alert: Tension"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AffectState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.as_str());
    }
}

// ============================================================================
// Channel Statistics
// ============================================================================

/// Mean and population standard deviation of one signal channel.
///
/// Recomputed wholesale from a full buffer snapshot once per statistics
/// cycle; the previous value is overwritten, never blended.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalStats {
    /// Arithmetic mean over the full window, in raw ADC counts
    pub mean: f32,
    /// Population standard deviation (divisor n), in raw ADC counts
    pub std_dev: f32,
}

impl SignalStats {
    /// Create statistics from known values
    #[inline]
    #[must_use]
    pub const fn new(mean: f32, std_dev: f32) -> Self {
        Self { mean, std_dev }
    }

    /// Compute statistics over a complete buffer snapshot.
    ///
    /// Every element participates, including zero-valued slots that have not
    /// been written since power-on.
    #[must_use]
    pub fn from_samples(samples: &[u16]) -> Self {
        let mean = math::mean(samples);
        let std_dev = math::population_std_dev(samples, mean);
        Self { mean, std_dev }
    }

    /// Mean truncated to an integer count, the encoding the mean-value
    /// characteristics carry
    #[inline]
    #[must_use]
    pub fn mean_counts(&self) -> i32 {
        self.mean as i32
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SignalStats {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "mean={} sd={}", self.mean, self.std_dev);
    }
}

/// The per-cycle statistics pair both classification tiers read.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct VitalsStats {
    /// Heart-rate channel statistics
    pub heart_rate: SignalStats,
    /// GSR channel statistics
    pub gsr: SignalStats,
}

impl VitalsStats {
    /// Create a statistics pair from known per-channel values
    #[inline]
    #[must_use]
    pub const fn new(heart_rate: SignalStats, gsr: SignalStats) -> Self {
        Self { heart_rate, gsr }
    }
}

// ============================================================================
// Baseline
// ============================================================================

/// Resting per-channel statistics the classifier compares against.
///
/// The baseline is fixed at construction (or replaced wholesale by a
/// recalibration); it is not rewritten by the statistics cycle. A sustained
/// deviation therefore stays visible to the classifier for as long as it
/// lasts, which is what lets the 15-cycle valid-period rule complete.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Resting heart-rate channel statistics
    pub heart_rate: SignalStats,
    /// Resting GSR channel statistics
    pub gsr: SignalStats,
}

impl Baseline {
    /// Default resting heart-rate assumption, in raw counts
    pub const RESTING_HEART: SignalStats = SignalStats::new(75.0, 5.0);

    /// Default resting GSR assumption, in raw counts
    pub const RESTING_GSR: SignalStats = SignalStats::new(500.0, 20.0);

    /// Create a baseline from known per-channel statistics
    #[inline]
    #[must_use]
    pub const fn new(heart_rate: SignalStats, gsr: SignalStats) -> Self {
        Self { heart_rate, gsr }
    }

    /// The factory resting baseline used before any calibration has run
    #[inline]
    #[must_use]
    pub const fn resting() -> Self {
        Self::new(Self::RESTING_HEART, Self::RESTING_GSR)
    }

    /// The statistics pair this baseline represents, for seeding the
    /// immediate tier before the first cycle completes
    #[inline]
    #[must_use]
    pub const fn as_stats(&self) -> VitalsStats {
        VitalsStats::new(self.heart_rate, self.gsr)
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::resting()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Baseline {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "hr[{}] gsr[{}]", self.heart_rate, self.gsr);
    }
}

// ============================================================================
// Tests
// ============================================================================
