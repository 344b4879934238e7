//! Simulated vitals source
//!
//! Deterministic stand-in for the band's analog front end. Each channel is
//! a sine around its resting level, evaluated on the channel's own nominal
//! sample timeline, so two sensors built from the same profile produce
//! identical sequences. No RNG anywhere. An optional stress onset raises
//! both channels enough to drive the sustained and immediate tiers end to
//! end without hardware.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use affectlink_core::config::{GSR_SAMPLE_PERIOD_MS, HR_SAMPLE_PERIOD_MS};
use affectlink_core::{SensorError, SensorSource};

/// Pulse waveform frequency (75 BPM)
const PULSE_HZ: f32 = 1.25;

/// Tonic GSR drift frequency
const GSR_DRIFT_HZ: f32 = 0.05;

/// Simulation profile
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimProfile {
    /// Resting heart-channel level (counts)
    pub resting_heart: f32,
    /// Heart-channel sine amplitude (counts)
    pub heart_wobble: f32,
    /// Resting GSR level (counts)
    pub resting_gsr: f32,
    /// GSR sine amplitude (counts)
    pub gsr_wobble: f32,
    /// Channel time after which the stress response holds (ms)
    pub stress_after_ms: Option<u64>,
    /// Heart-channel elevation under stress (counts)
    pub stress_heart_boost: f32,
    /// GSR elevation under stress (counts)
    pub stress_gsr_boost: f32,
}

impl Default for SimProfile {
    fn default() -> Self {
        Self {
            resting_heart: 75.0,
            heart_wobble: 3.0,
            // Sits below the default baseline mean so resting runs stay
            // clear of the sustained threshold
            resting_gsr: 480.0,
            gsr_wobble: 15.0,
            stress_after_ms: None,
            stress_heart_boost: 25.0,
            stress_gsr_boost: 120.0,
        }
    }
}

impl SimProfile {
    /// Resting profile with a stress response from `onset_ms` onward
    #[must_use]
    pub fn stressed_after(onset_ms: u64) -> Self {
        Self {
            stress_after_ms: Some(onset_ms),
            ..Self::default()
        }
    }

    fn stress_active(&self, t_ms: u64) -> bool {
        matches!(self.stress_after_ms, Some(onset) if t_ms >= onset)
    }
}

/// Deterministic sensor source generated from a [`SimProfile`].
///
/// Each channel keeps its own read counter and maps it to time at the
/// channel's nominal rate (50 Hz heart, 200 Hz GSR). The waveform depends
/// only on that counter, never on the host clock.
#[derive(Clone, Debug)]
pub struct SimulatedSensors {
    profile: SimProfile,
    heart_reads: u64,
    gsr_reads: u64,
}

impl SimulatedSensors {
    /// Create a source from a profile
    #[must_use]
    pub fn new(profile: SimProfile) -> Self {
        Self {
            profile,
            heart_reads: 0,
            gsr_reads: 0,
        }
    }

    /// Resting source with no stress response
    #[must_use]
    pub fn resting() -> Self {
        Self::new(SimProfile::default())
    }

    /// The profile this source was built from
    #[must_use]
    pub const fn profile(&self) -> &SimProfile {
        &self.profile
    }
}

impl SensorSource for SimulatedSensors {
    fn read_heart_rate(&mut self) -> Result<u16, SensorError> {
        let t_ms = self.heart_reads * HR_SAMPLE_PERIOD_MS;
        self.heart_reads += 1;

        let t_s = t_ms as f32 / 1000.0;
        let wave = self.profile.heart_wobble * (2.0 * PI * PULSE_HZ * t_s).sin();
        let mut value = self.profile.resting_heart + wave;
        if self.profile.stress_active(t_ms) {
            value += self.profile.stress_heart_boost;
        }
        Ok(quantize(value))
    }

    fn read_gsr(&mut self) -> Result<u16, SensorError> {
        let t_ms = self.gsr_reads * GSR_SAMPLE_PERIOD_MS;
        self.gsr_reads += 1;

        let t_s = t_ms as f32 / 1000.0;
        let wave = self.profile.gsr_wobble * (2.0 * PI * GSR_DRIFT_HZ * t_s).sin();
        let mut value = self.profile.resting_gsr + wave;
        if self.profile.stress_active(t_ms) {
            value += self.profile.stress_gsr_boost;
        }
        Ok(quantize(value))
    }
}

/// Round to raw counts, clamping below zero
fn quantize(value: f32) -> u16 {
    value.max(0.0).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(sensors: &mut SimulatedSensors, reads: usize) -> (Vec<u16>, Vec<u16>) {
        let mut heart = Vec::with_capacity(reads);
        let mut gsr = Vec::with_capacity(reads);
        for _ in 0..reads {
            heart.push(sensors.read_heart_rate().unwrap());
            gsr.push(sensors.read_gsr().unwrap());
        }
        (heart, gsr)
    }

    #[test]
    fn test_identical_profiles_identical_sequences() {
        let mut a = SimulatedSensors::resting();
        let mut b = SimulatedSensors::resting();

        assert_eq!(drain(&mut a, 500), drain(&mut b, 500));
    }

    #[test]
    fn test_resting_levels_stay_near_profile() {
        let mut sensors = SimulatedSensors::resting();
        let (heart, gsr) = drain(&mut sensors, 3000);

        assert!(heart.iter().all(|&v| (72..=78).contains(&v)), "heart in resting band");
        assert!(gsr.iter().all(|&v| (465..=495).contains(&v)), "gsr in resting band");
    }

    #[test]
    fn test_stress_elevates_both_channels() {
        let mut resting = SimulatedSensors::resting();
        let mut stressed = SimulatedSensors::new(SimProfile::stressed_after(0));

        let (calm_heart, calm_gsr) = drain(&mut resting, 200);
        let (hot_heart, hot_gsr) = drain(&mut stressed, 200);

        let calm_max = calm_heart.iter().max().copied().unwrap();
        let hot_min = hot_heart.iter().min().copied().unwrap();
        assert!(hot_min > calm_max, "stress lifts the heart channel");

        let calm_max = calm_gsr.iter().max().copied().unwrap();
        let hot_min = hot_gsr.iter().min().copied().unwrap();
        assert!(hot_min > calm_max, "stress lifts the GSR channel");
    }

    #[test]
    fn test_stress_onset_respects_channel_time() {
        // Onset at 1s: the heart channel crosses it at read 50, GSR at 200
        let mut sensors = SimulatedSensors::new(SimProfile::stressed_after(1_000));
        let (heart, _) = drain(&mut sensors, 60);

        assert!(heart[49] < 90, "read 49 is still resting");
        assert!(heart[50] >= 90, "read 50 is stressed");
    }
}
