//! Due-instant cadence tracking for the acquisition loop
//!
//! The control loop polls at whatever rate its host manages; nothing here
//! assumes a fixed tick. Each cadence keeps the next instant it owes a
//! firing and fires when the clock has reached it, then realigns to the
//! next multiple of its period beyond the current time. A late poll
//! therefore handles a missed instant exactly once and never bursts to
//! catch up; a repeated poll at the same instant fires nothing twice.
//!
//! Time zero is a due instant for every cadence.

/// One periodic duty, tracked by its next due instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cadence {
    period_ms: u64,
    next_due_ms: u64,
}

impl Cadence {
    /// Create a cadence with the given period.
    ///
    /// The period must be non-zero.
    #[inline]
    #[must_use]
    pub const fn new(period_ms: u64) -> Self {
        debug_assert!(period_ms > 0);
        Self {
            period_ms,
            next_due_ms: 0,
        }
    }

    /// Fire if the clock has reached the next due instant.
    ///
    /// On a firing the next due instant becomes the first period multiple
    /// strictly after `now_ms`, so one poll fires at most once however far
    /// the clock has jumped.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms - now_ms % self.period_ms + self.period_ms;
        true
    }

    /// Configured period in milliseconds
    #[inline]
    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Next instant this cadence will fire at
    #[inline]
    #[must_use]
    pub const fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }
}

/// What one scheduler poll decided is due.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Due {
    /// Acquire a heart-rate sample this poll
    pub heart_rate: bool,
    /// Acquire a GSR sample this poll
    pub gsr: bool,
    /// Run the statistics/classification cycle this poll
    pub statistics: bool,
}

/// The three acquisition cadences, polled together.
///
/// The immediate-alert check is not gated here; the controller runs it on
/// every poll regardless of what this scheduler reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SampleScheduler {
    heart_rate: Cadence,
    gsr: Cadence,
    statistics: Cadence,
}

impl SampleScheduler {
    /// Create a scheduler from the three cadence periods
    #[inline]
    #[must_use]
    pub const fn new(heart_period_ms: u64, gsr_period_ms: u64, cycle_period_ms: u64) -> Self {
        Self {
            heart_rate: Cadence::new(heart_period_ms),
            gsr: Cadence::new(gsr_period_ms),
            statistics: Cadence::new(cycle_period_ms),
        }
    }

    /// Poll all cadences against the current clock reading
    pub fn poll(&mut self, now_ms: u64) -> Due {
        Due {
            heart_rate: self.heart_rate.poll(now_ms),
            gsr: self.gsr.poll(now_ms),
            statistics: self.statistics.poll(now_ms),
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
    fn test_time_zero_is_due() {
        let mut cadence = Cadence::new(20);
        assert!(cadence.poll(0));
        assert_eq!(cadence.next_due_ms(), 20);
    }

    #[test]
    fn test_same_instant_never_fires_twice() {
        let mut cadence = Cadence::new(20);
        assert!(cadence.poll(40));
        assert!(!cadence.poll(40));
        assert!(!cadence.poll(41));
        assert!(cadence.poll(60));
    }

    #[test]
    fn test_late_first_poll_fires_once() {
        let mut cadence = Cadence::new(20);
        // First poll arrives mid-period; the t=0 instant is handled once
        // and the cadence realigns to the grid.
        assert!(cadence.poll(7));
        assert_eq!(cadence.next_due_ms(), 20);
        assert!(!cadence.poll(19));
        assert!(cadence.poll(20));
    }

    #[test]
    fn test_clock_jump_handles_missed_instants_once() {
        let mut cadence = Cadence::new(20);
        assert!(cadence.poll(0));

        // 47 skips the instants at 20 and 40; exactly one firing results.
        assert!(cadence.poll(47));
        assert_eq!(cadence.next_due_ms(), 60);
        assert!(!cadence.poll(59));
        assert!(cadence.poll(60));
    }

    #[test]
    fn test_nominal_rates_over_one_minute() {
        let mut sched = SampleScheduler::new(20, 5, 60_000);
        let mut heart = 0u32;
        let mut gsr = 0u32;
        let mut cycles = 0u32;

        for now in 0..60_000u64 {
            let due = sched.poll(now);
            heart += u32::from(due.heart_rate);
            gsr += u32::from(due.gsr);
            cycles += u32::from(due.statistics);
        }

        assert_eq!(heart, 3000);
        assert_eq!(gsr, 12000);
        assert_eq!(cycles, 1);
    }

    #[test]
    fn test_irregular_polling_tracks_the_grid() {
        let mut cadence = Cadence::new(5);
        let mut fired = 0u32;

        // Uneven poll instants covering 0..=40. No instant is ever handled
        // twice, and a poll that skips past several due instants fires once.
        for now in [0u64, 1, 4, 5, 6, 11, 12, 18, 22, 27, 29, 33, 40] {
            fired += u32::from(cadence.poll(now));
        }

        // Firings at 0, 5, 11, 18, 22, 27, 33, 40; the poll at 40 covers
        // both the 35 and 40 grid instants with a single firing.
        assert_eq!(fired, 8);
    }

    #[test]
    fn test_scheduler_polls_all_three_cadences() {
        let mut sched = SampleScheduler::new(20, 5, 60_000);

        let due = sched.poll(0);
        assert!(due.heart_rate && due.gsr && due.statistics);

        let due = sched.poll(5);
        assert!(!due.heart_rate && due.gsr && !due.statistics);

        let due = sched.poll(20);
        assert!(due.heart_rate && due.gsr && !due.statistics);
    }
}
