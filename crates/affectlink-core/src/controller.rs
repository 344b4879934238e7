//! The long-lived control object driving acquisition and classification
//!
//! One [`AffectController`] owns every piece of mutable state in the system:
//! both sample rings, the scheduler, the classifier, the hysteresis tracker,
//! and the three collaborators it is generic over. The host calls
//! [`AffectController::poll`] in a loop; everything else happens inside.
//!
//! Per poll: read the clock, fire whichever cadences are due (sampling into
//! the rings, running the statistics cycle), then re-check the immediate
//! tier against the last computed statistics. A statistics cycle publishes
//! the window means, the sustained-state text, and a valid-period alert on a
//! fresh threshold crossing. Alerts are edge-triggered; nothing is
//! re-published while its trigger condition merely persists.

use serde::{Deserialize, Serialize};

use crate::classify::AffectClassifier;
use crate::config::{ControllerConfig, GSR_WINDOW_SAMPLES, HR_WINDOW_SAMPLES};
use crate::error::SensorError;
use crate::hal::{ClockSource, SensorSource, TelemetrySink};
use crate::hysteresis::HysteresisTracker;
use crate::ring::SampleRing;
use crate::sched::SampleScheduler;
use crate::types::{AffectState, Baseline, SignalStats, VitalsStats};

// ============================================================================
// Poll Outcome
// ============================================================================

/// Summary of what one [`AffectController::poll`] call did.
///
/// The driving layer uses this for its own logging and accounting; the
/// controller has already published everything telemetry-worthy by the time
/// it returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOutcome {
    /// A heart-rate sample was acquired and buffered
    pub heart_rate_sampled: bool,
    /// A GSR sample was acquired and buffered
    pub gsr_sampled: bool,
    /// The statistics/classification cycle ran
    pub cycle_completed: bool,
    /// Sensor reads that failed on this poll (0, 1, or 2)
    pub sensor_faults: u8,
}

// ============================================================================
// Controller
// ============================================================================

/// Fixed-rate sampler and two-tier emotional-state classifier.
///
/// Generic over the sensor source, clock, and telemetry sink so the same
/// control loop runs against hardware drivers on the device and simulated
/// collaborators on a host. All state is owned here; nothing is global.
pub struct AffectController<S, C, T> {
    sensors: S,
    clock: C,
    sink: T,
    scheduler: SampleScheduler,
    classifier: AffectClassifier,
    tracker: HysteresisTracker,
    heart_ring: SampleRing<u16, HR_WINDOW_SAMPLES>,
    gsr_ring: SampleRing<u16, GSR_WINDOW_SAMPLES>,
    baseline: Baseline,
    current: VitalsStats,
    last_sustained: AffectState,
    last_immediate: AffectState,
    last_valid: Option<AffectState>,
    last_fault: Option<SensorError>,
    fault_count: u32,
    cycle_count: u32,
}

impl<S, C, T> AffectController<S, C, T>
where
    S: SensorSource,
    C: ClockSource,
    T: TelemetrySink,
{
    /// Create a controller around its three collaborators.
    ///
    /// The immediate tier starts against the configured baseline's own
    /// statistics, so it reads neutral until the first cycle completes.
    #[must_use]
    pub fn new(sensors: S, clock: C, sink: T, config: ControllerConfig) -> Self {
        Self {
            sensors,
            clock,
            sink,
            scheduler: SampleScheduler::new(
                config.heart_period_ms,
                config.gsr_period_ms,
                config.cycle_period_ms,
            ),
            classifier: AffectClassifier::new(config.sustained_sigma, config.immediate_sigma),
            tracker: HysteresisTracker::new(config.valid_period_cycles),
            heart_ring: SampleRing::new(),
            gsr_ring: SampleRing::new(),
            baseline: config.baseline,
            current: config.baseline.as_stats(),
            last_sustained: AffectState::Neutral,
            last_immediate: AffectState::Neutral,
            last_valid: None,
            last_fault: None,
            fault_count: 0,
            cycle_count: 0,
        }
    }

    /// Run one control-loop iteration.
    pub fn poll(&mut self) -> PollOutcome {
        let now_ms = self.clock.now_millis();
        let due = self.scheduler.poll(now_ms);
        let mut outcome = PollOutcome::default();

        if due.heart_rate {
            match self.sensors.read_heart_rate() {
                Ok(sample) => {
                    self.heart_ring.push(sample);
                    outcome.heart_rate_sampled = true;
                }
                Err(err) => self.record_fault(err, &mut outcome),
            }
        }

        if due.gsr {
            match self.sensors.read_gsr() {
                Ok(sample) => {
                    self.gsr_ring.push(sample);
                    outcome.gsr_sampled = true;
                }
                Err(err) => self.record_fault(err, &mut outcome),
            }
        }

        if due.statistics {
            self.run_cycle();
            outcome.cycle_completed = true;
        }

        self.check_immediate();
        outcome
    }

    /// Replace the resting baseline and clear every in-progress streak.
    pub fn recalibrate(&mut self, baseline: Baseline) {
        self.baseline = baseline;
        self.tracker.reset();
        self.last_valid = None;
    }

    /// Last sustained-tier state (neutral until the first cycle)
    #[inline]
    #[must_use]
    pub const fn state(&self) -> AffectState {
        self.last_sustained
    }

    /// Statistics pair the immediate tier is currently reading
    #[inline]
    #[must_use]
    pub const fn current_stats(&self) -> VitalsStats {
        self.current
    }

    /// Baseline the classifier compares against
    #[inline]
    #[must_use]
    pub const fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// Category currently holding a valid period, if any
    #[inline]
    #[must_use]
    pub const fn valid_period(&self) -> Option<AffectState> {
        self.tracker.valid_period()
    }

    /// Whether both rings have seen a full window since power-on
    #[inline]
    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.heart_ring.is_warm() && self.gsr_ring.is_warm()
    }

    /// Total failed sensor reads since construction
    #[inline]
    #[must_use]
    pub const fn fault_count(&self) -> u32 {
        self.fault_count
    }

    /// Most recent sensor fault, if any have occurred
    #[inline]
    #[must_use]
    pub const fn last_fault(&self) -> Option<SensorError> {
        self.last_fault
    }

    /// Completed statistics cycles since construction
    #[inline]
    #[must_use]
    pub const fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    fn record_fault(&mut self, err: SensorError, outcome: &mut PollOutcome) {
        self.last_fault = Some(err);
        self.fault_count += 1;
        outcome.sensor_faults += 1;
    }

    fn run_cycle(&mut self) {
        let stats = VitalsStats::new(
            SignalStats::from_samples(self.heart_ring.as_slice()),
            SignalStats::from_samples(self.gsr_ring.as_slice()),
        );

        self.sink.publish_heart_rate(stats.heart_rate.mean_counts());
        self.sink.publish_gsr(stats.gsr.mean_counts());

        let state = self.classifier.sustained(&stats, &self.baseline);
        self.sink.publish_state(state.as_str());
        self.tracker.observe(state);

        let valid = self.tracker.valid_period();
        if valid != self.last_valid {
            if let Some(alert) = valid.and_then(AffectState::valid_period_alert) {
                self.sink.publish_alert(alert);
            }
            self.last_valid = valid;
        }

        self.last_sustained = state;
        self.current = stats;
        self.cycle_count += 1;
    }

    fn check_immediate(&mut self) {
        let state = self.classifier.immediate(&self.current, &self.baseline);
        if state != self.last_immediate {
            if let Some(alert) = state.immediate_alert() {
                self.sink.publish_alert(alert);
            }
            self.last_immediate = state;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
