//! Traits the controller needs from its surroundings
//!
//! The core never talks to hardware or a radio directly. It consumes three
//! narrow, synchronous interfaces: a sensor source producing raw ADC counts
//! on demand, a monotonic millisecond clock, and a fire-and-forget telemetry
//! sink. Firmware supplies driver-backed implementations; the host side
//! supplies simulated ones.

use crate::error::SensorError;

/// On-demand access to the two analog channels.
///
/// Reads are synchronous and non-blocking. A failed read is reported
/// through [`SensorError`]; the control loop logs it, counts it, and skips
/// the sample without touching buffer state.
pub trait SensorSource {
    /// Read one raw heart-rate sample
    fn read_heart_rate(&mut self) -> Result<u16, SensorError>;

    /// Read one raw GSR sample
    fn read_gsr(&mut self) -> Result<u16, SensorError>;
}

/// Monotonic millisecond clock.
pub trait ClockSource {
    /// Milliseconds since an arbitrary epoch; never decreases.
    fn now_millis(&self) -> u64;
}

/// Best-effort outbound telemetry.
///
/// Every publish is fire-and-forget: implementations must not block, and no
/// acknowledgment or backpressure signal ever reaches the control loop.
pub trait TelemetrySink {
    /// Publish the heart-rate window mean, in integer counts
    fn publish_heart_rate(&mut self, mean: i32);

    /// Publish the GSR window mean, in integer counts
    fn publish_gsr(&mut self, mean: i32);

    /// Publish the sustained-state text
    fn publish_state(&mut self, state: &str);

    /// Publish an alert text (valid period or immediate trigger)
    fn publish_alert(&mut self, alert: &str);
}
