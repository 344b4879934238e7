//! Session runners
//!
//! Drive an [`AffectController`] for a fixed span of session time, either
//! in realtime (sleeping one tick between polls) or accelerated (advancing
//! a [`ManualClock`] one millisecond per poll, no sleeping). Both report a
//! [`SessionSummary`] and log faults and completed cycles through
//! `tracing`.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use affectlink_core::{AffectController, ClockSource, PollOutcome, SensorSource, TelemetrySink};

use crate::clock::ManualClock;

/// Poll cadence for realtime sessions (ms)
const REALTIME_TICK_MS: u64 = 1;

/// Accelerated sessions yield to the runtime every this many polls
const ACCEL_YIELD_INTERVAL: u64 = 4096;

/// Totals accumulated over one session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Control-loop polls executed
    pub polls: u64,
    /// Heart-rate samples buffered
    pub heart_rate_samples: u64,
    /// GSR samples buffered
    pub gsr_samples: u64,
    /// Statistics cycles completed
    pub cycles: u64,
    /// Failed sensor reads
    pub sensor_faults: u64,
}

impl SessionSummary {
    fn record(&mut self, outcome: &PollOutcome) {
        self.polls += 1;
        if outcome.heart_rate_sampled {
            self.heart_rate_samples += 1;
        }
        if outcome.gsr_sampled {
            self.gsr_samples += 1;
        }
        if outcome.cycle_completed {
            self.cycles += 1;
        }
        self.sensor_faults += u64::from(outcome.sensor_faults);
    }
}

/// Run a controller against the wall clock for `duration_ms`
pub async fn run_realtime<S, C, T>(
    controller: &mut AffectController<S, C, T>,
    duration_ms: u64,
) -> SessionSummary
where
    S: SensorSource,
    C: ClockSource,
    T: TelemetrySink,
{
    let mut summary = SessionSummary::default();
    let duration = Duration::from_millis(duration_ms);
    let started = Instant::now();

    while started.elapsed() < duration {
        let outcome = controller.poll();
        observe(controller, &outcome, &mut summary);
        tokio::time::sleep(Duration::from_millis(REALTIME_TICK_MS)).await;
    }

    info!(
        polls = summary.polls,
        cycles = summary.cycles,
        faults = summary.sensor_faults,
        "realtime session complete"
    );
    summary
}

/// Run a controller through `duration_ms` of simulated time.
///
/// Advances `clock` one millisecond per poll, so a one-hour session
/// finishes in however long 3.6 million polls take. Yields to the runtime
/// periodically to keep the executor responsive.
pub async fn run_accelerated<S, T>(
    controller: &mut AffectController<S, ManualClock, T>,
    clock: &ManualClock,
    duration_ms: u64,
) -> SessionSummary
where
    S: SensorSource,
    T: TelemetrySink,
{
    let mut summary = SessionSummary::default();

    for tick in 0..duration_ms {
        clock.advance(1);
        let outcome = controller.poll();
        observe(controller, &outcome, &mut summary);

        if tick % ACCEL_YIELD_INTERVAL == 0 {
            tokio::task::yield_now().await;
        }
    }

    info!(
        polls = summary.polls,
        cycles = summary.cycles,
        faults = summary.sensor_faults,
        "accelerated session complete"
    );
    summary
}

fn observe<S, C, T>(
    controller: &AffectController<S, C, T>,
    outcome: &PollOutcome,
    summary: &mut SessionSummary,
) where
    S: SensorSource,
    C: ClockSource,
    T: TelemetrySink,
{
    summary.record(outcome);

    if outcome.sensor_faults > 0 {
        if let Some(fault) = controller.last_fault() {
            warn!(%fault, "sensor read failed, sample skipped");
        }
    }

    if outcome.cycle_completed {
        let stats = controller.current_stats();
        info!(
            cycle = controller.cycle_count(),
            state = controller.state().as_str(),
            heart_mean = stats.heart_rate.mean,
            gsr_mean = stats.gsr.mean,
            "statistics cycle completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use affectlink_core::{AffectState, ControllerConfig};

    use crate::clock::SystemClock;
    use crate::sim::{SimProfile, SimulatedSensors};
    use crate::telemetry::{ChannelTelemetry, TelemetryEvent};

    use super::*;

    #[test]
    fn test_summary_accumulates_outcomes() {
        let mut summary = SessionSummary::default();
        summary.record(&PollOutcome {
            heart_rate_sampled: true,
            gsr_sampled: true,
            cycle_completed: false,
            sensor_faults: 0,
        });
        summary.record(&PollOutcome {
            heart_rate_sampled: false,
            gsr_sampled: true,
            cycle_completed: true,
            sensor_faults: 2,
        });

        assert_eq!(summary.polls, 2);
        assert_eq!(summary.heart_rate_samples, 1);
        assert_eq!(summary.gsr_samples, 2);
        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.sensor_faults, 2);
    }

    #[tokio::test]
    async fn test_accelerated_minute_fills_the_window() {
        let clock = ManualClock::new();
        let mut controller = AffectController::new(
            SimulatedSensors::resting(),
            clock.clone(),
            ChannelTelemetry::new(),
            ControllerConfig::default(),
        );

        let summary = run_accelerated(&mut controller, &clock, 61_000).await;

        // The first poll lands at t=1 and catches every t=0 due instant
        assert_eq!(summary.polls, 61_000);
        assert_eq!(summary.heart_rate_samples, 3_051);
        assert_eq!(summary.gsr_samples, 12_201);
        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.sensor_faults, 0);
        assert!(controller.is_warm());
        assert_eq!(controller.state(), AffectState::Neutral);
    }

    #[tokio::test]
    async fn test_stressed_session_reaches_tension() {
        let clock = ManualClock::new();
        let sink = ChannelTelemetry::new();
        let mut stream = sink.subscribe();
        let mut controller = AffectController::new(
            SimulatedSensors::new(SimProfile::stressed_after(0)),
            clock.clone(),
            sink,
            ControllerConfig::default(),
        );

        let summary = run_accelerated(&mut controller, &clock, 60_001).await;

        assert_eq!(summary.cycles, 2);
        assert_eq!(controller.state(), AffectState::Tension);

        let mut events = Vec::new();
        for _ in 0..7 {
            events.push(stream.next_event().await.unwrap());
        }

        // Warm-up cycle averages a nearly empty ring
        assert_eq!(events[0], TelemetryEvent::HeartRateMean(0));
        assert_eq!(events[1], TelemetryEvent::GsrMean(0));
        assert_eq!(events[2], TelemetryEvent::State("Neutral".to_string()));
        // Full window of stressed samples flips the sustained tier and
        // trips the immediate tier once
        assert_eq!(events[5], TelemetryEvent::State("Tension".to_string()));
        assert_eq!(events[6], TelemetryEvent::Alert("Alert: Tension".to_string()));
    }

    #[tokio::test]
    async fn test_realtime_session_polls_until_deadline() {
        let mut controller = AffectController::new(
            SimulatedSensors::resting(),
            SystemClock::new(),
            ChannelTelemetry::new(),
            ControllerConfig::default(),
        );

        let summary = run_realtime(&mut controller, 30).await;

        assert!(summary.polls >= 1);
        assert!(summary.gsr_samples >= summary.heart_rate_samples);
    }
}
