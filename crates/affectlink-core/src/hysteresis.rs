//! Consecutive-cycle hysteresis over sustained-state observations
//!
//! One observation is recorded per statistics cycle. A non-neutral category
//! must hold for a configurable run of consecutive cycles before it counts
//! as a valid period; any neutral cycle, or a switch to the other category,
//! starts the count over.

use crate::types::AffectState;

/// Counts consecutive sustained-state observations per tracked category.
///
/// The two counters are mutually exclusive: an observation that increments
/// one zeroes the other, and a neutral observation zeroes both. The
/// valid-period predicate is level-based; it keeps reporting the category
/// for as long as its run continues. Edge detection for alerting is the
/// controller's job.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HysteresisTracker {
    tension: u32,
    joy: u32,
    threshold: u32,
}

impl HysteresisTracker {
    /// Create a tracker requiring `threshold` consecutive cycles
    #[inline]
    #[must_use]
    pub const fn new(threshold: u32) -> Self {
        Self {
            tension: 0,
            joy: 0,
            threshold,
        }
    }

    /// Record one sustained-tier observation.
    pub fn observe(&mut self, state: AffectState) {
        match state {
            AffectState::Tension => {
                self.joy = 0;
                self.tension += 1;
            }
            AffectState::Joy => {
                self.tension = 0;
                self.joy += 1;
            }
            AffectState::Neutral => {
                self.tension = 0;
                self.joy = 0;
            }
        }
    }

    /// Category whose run has reached the threshold, if any.
    ///
    /// The counters are mutually exclusive, so at most one category can be
    /// at threshold.
    #[inline]
    #[must_use]
    pub const fn valid_period(&self) -> Option<AffectState> {
        if self.tension >= self.threshold {
            Some(AffectState::Tension)
        } else if self.joy >= self.threshold {
            Some(AffectState::Joy)
        } else {
            None
        }
    }

    /// Current consecutive-Tension count
    #[inline]
    #[must_use]
    pub const fn tension_count(&self) -> u32 {
        self.tension
    }

    /// Current consecutive-Joy count
    #[inline]
    #[must_use]
    pub const fn joy_count(&self) -> u32 {
        self.joy
    }

    /// Zero both counters, as after a recalibration.
    pub fn reset(&mut self) {
        self.tension = 0;
        self.joy = 0;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HysteresisTracker {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "tension={} joy={}", self.tension, self.joy);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_consecutive_observations() {
        let mut tracker = HysteresisTracker::new(15);
        tracker.observe(AffectState::Tension);
        tracker.observe(AffectState::Tension);
        assert_eq!(tracker.tension_count(), 2);
        assert_eq!(tracker.joy_count(), 0);
    }

    #[test]
    fn test_mutual_exclusion_after_any_observation() {
        let mut tracker = HysteresisTracker::new(15);
        for _ in 0..5 {
            tracker.observe(AffectState::Tension);
        }
        tracker.observe(AffectState::Joy);

        assert_eq!(tracker.tension_count(), 0);
        assert_eq!(tracker.joy_count(), 1);
        assert!(!(tracker.tension_count() > 0 && tracker.joy_count() > 0));
    }

    #[test]
    fn test_neutral_resets_both_counters() {
        let mut tracker = HysteresisTracker::new(15);
        for _ in 0..14 {
            tracker.observe(AffectState::Tension);
        }
        tracker.observe(AffectState::Neutral);
        assert_eq!(tracker.tension_count(), 0);
        assert_eq!(tracker.joy_count(), 0);

        for _ in 0..7 {
            tracker.observe(AffectState::Joy);
        }
        tracker.observe(AffectState::Neutral);
        assert_eq!(tracker.tension_count(), 0);
        assert_eq!(tracker.joy_count(), 0);
    }

    #[test]
    fn test_no_valid_period_before_threshold() {
        let mut tracker = HysteresisTracker::new(15);
        for _ in 0..14 {
            tracker.observe(AffectState::Tension);
            assert_eq!(tracker.valid_period(), None);
        }
    }

    #[test]
    fn test_valid_period_at_threshold() {
        let mut tracker = HysteresisTracker::new(15);
        for _ in 0..15 {
            tracker.observe(AffectState::Tension);
        }
        assert_eq!(tracker.valid_period(), Some(AffectState::Tension));
    }

    #[test]
    fn test_valid_period_is_level_based() {
        let mut tracker = HysteresisTracker::new(15);
        for _ in 0..20 {
            tracker.observe(AffectState::Joy);
        }
        // Still reporting while the run continues.
        assert_eq!(tracker.valid_period(), Some(AffectState::Joy));
        assert_eq!(tracker.joy_count(), 20);
    }

    #[test]
    fn test_category_switch_restarts_run() {
        let mut tracker = HysteresisTracker::new(3);
        tracker.observe(AffectState::Tension);
        tracker.observe(AffectState::Tension);
        tracker.observe(AffectState::Joy);
        tracker.observe(AffectState::Joy);
        tracker.observe(AffectState::Joy);

        assert_eq!(tracker.valid_period(), Some(AffectState::Joy));
        assert_eq!(tracker.tension_count(), 0);
    }

    #[test]
    fn test_reset_clears_a_qualifying_run() {
        let mut tracker = HysteresisTracker::new(2);
        tracker.observe(AffectState::Tension);
        tracker.observe(AffectState::Tension);
        assert!(tracker.valid_period().is_some());

        tracker.reset();
        assert_eq!(tracker.valid_period(), None);
        assert_eq!(tracker.tension_count(), 0);
    }
}
