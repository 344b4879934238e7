//! Threshold classification against the resting baseline
//!
//! Both tiers read the same statistics pair computed at the last cycle
//! boundary; they differ only in how many baseline standard deviations a
//! channel mean must clear to count as elevated. The sustained tier uses one
//! sigma, the immediate tier two.

use crate::types::{AffectState, Baseline, SignalStats, VitalsStats};

/// Map the two per-channel elevation flags to a state.
///
/// Elevated GSR without elevated heart rate is still neutral; the heart-rate
/// channel gates everything.
#[inline]
#[must_use]
pub const fn decide(heart_high: bool, gsr_high: bool) -> AffectState {
    match (heart_high, gsr_high) {
        (true, true) => AffectState::Tension,
        (true, false) => AffectState::Joy,
        (false, _) => AffectState::Neutral,
    }
}

/// Whether a channel mean exceeds its baseline by `sigma` baseline standard
/// deviations.
///
/// Strictly greater: a mean sitting exactly on the threshold is not
/// elevated.
#[inline]
#[must_use]
pub fn elevated(current: SignalStats, baseline: SignalStats, sigma: f32) -> bool {
    current.mean > baseline.mean + sigma * baseline.std_dev
}

/// Two-tier state classifier.
///
/// Holds the per-tier sigma coefficients; all channel state lives in the
/// caller. Classification is purely combinational.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffectClassifier {
    sustained_sigma: f32,
    immediate_sigma: f32,
}

impl AffectClassifier {
    /// Create a classifier with explicit tier coefficients
    #[inline]
    #[must_use]
    pub const fn new(sustained_sigma: f32, immediate_sigma: f32) -> Self {
        Self {
            sustained_sigma,
            immediate_sigma,
        }
    }

    /// Classify the sustained tier (once-per-cycle state)
    #[must_use]
    pub fn sustained(&self, current: &VitalsStats, baseline: &Baseline) -> AffectState {
        self.classify(current, baseline, self.sustained_sigma)
    }

    /// Classify the immediate tier (re-checked every poll, stricter sigma)
    #[must_use]
    pub fn immediate(&self, current: &VitalsStats, baseline: &Baseline) -> AffectState {
        self.classify(current, baseline, self.immediate_sigma)
    }

    fn classify(&self, current: &VitalsStats, baseline: &Baseline, sigma: f32) -> AffectState {
        let heart_high = elevated(current.heart_rate, baseline.heart_rate, sigma);
        let gsr_high = elevated(current.gsr, baseline.gsr, sigma);
        decide(heart_high, gsr_high)
    }
}

impl Default for AffectClassifier {
    fn default() -> Self {
        Self::new(1.0, 2.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hr_mean: f32, gsr_mean: f32) -> VitalsStats {
        VitalsStats::new(SignalStats::new(hr_mean, 0.0), SignalStats::new(gsr_mean, 0.0))
    }

    #[test]
    fn test_decision_table_all_combinations() {
        assert_eq!(decide(true, true), AffectState::Tension);
        assert_eq!(decide(true, false), AffectState::Joy);
        assert_eq!(decide(false, true), AffectState::Neutral);
        assert_eq!(decide(false, false), AffectState::Neutral);
    }

    #[test]
    fn test_elevation_is_strictly_greater() {
        let baseline = SignalStats::new(75.0, 5.0);

        // Exactly one sigma above the mean is NOT elevated.
        assert!(!elevated(SignalStats::new(80.0, 0.0), baseline, 1.0));
        assert!(elevated(SignalStats::new(80.1, 0.0), baseline, 1.0));
    }

    #[test]
    fn test_zero_deviation_baseline_still_strict() {
        let flat = SignalStats::new(80.0, 0.0);
        assert!(!elevated(SignalStats::new(80.0, 0.0), flat, 1.0));
        assert!(elevated(SignalStats::new(80.5, 0.0), flat, 2.0));
    }

    #[test]
    fn test_sustained_tension_needs_both_channels() {
        let classifier = AffectClassifier::default();
        let baseline = Baseline::resting();

        // hr > 75 + 5, gsr > 500 + 20.
        assert_eq!(
            classifier.sustained(&stats(85.0, 530.0), &baseline),
            AffectState::Tension
        );
        assert_eq!(
            classifier.sustained(&stats(85.0, 510.0), &baseline),
            AffectState::Joy
        );
        assert_eq!(
            classifier.sustained(&stats(78.0, 530.0), &baseline),
            AffectState::Neutral
        );
    }

    #[test]
    fn test_immediate_tier_is_stricter() {
        let classifier = AffectClassifier::default();
        let baseline = Baseline::resting();

        // 82 clears one sigma (80) but not two (85).
        let current = stats(82.0, 400.0);
        assert_eq!(classifier.sustained(&current, &baseline), AffectState::Joy);
        assert_eq!(classifier.immediate(&current, &baseline), AffectState::Neutral);

        // 90 clears both.
        let spiked = stats(90.0, 400.0);
        assert_eq!(classifier.immediate(&spiked, &baseline), AffectState::Joy);
    }

    #[test]
    fn test_self_comparison_stays_neutral() {
        // Comparing a window against a baseline equal to itself can never
        // elevate: mean > mean + sigma * sd fails for sd >= 0.
        let classifier = AffectClassifier::default();
        let current = stats(80.0, 400.0);
        let self_base = Baseline::new(current.heart_rate, current.gsr);
        assert_eq!(
            classifier.sustained(&current, &self_base),
            AffectState::Neutral
        );
        assert_eq!(
            classifier.immediate(&current, &self_base),
            AffectState::Neutral
        );
    }
}
