//! Telemetry fan-out over tokio broadcast channels
//!
//! [`ChannelTelemetry`] gives the controller a host-side
//! [`TelemetrySink`]: every publish becomes a [`TelemetryEvent`] on a
//! broadcast channel. Any number of [`TelemetryStream`] subscribers can
//! follow along; a slow subscriber loses old events rather than stalling
//! the control loop.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use affectlink_core::TelemetrySink;

/// Default broadcast capacity. Telemetry is cycle-paced (a few events per
/// minute), so even short buffers only lag pathological subscribers.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// One published telemetry value
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TelemetryEvent {
    /// Heart-rate window mean in counts
    HeartRateMean(i32),
    /// GSR window mean in counts
    GsrMean(i32),
    /// Sustained state text
    State(String),
    /// Alert text (valid period or immediate trigger)
    Alert(String),
}

/// Telemetry stream failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Publisher dropped; no further events will arrive
    #[error("Telemetry channel closed")]
    Closed,

    /// Subscriber fell behind and the channel discarded events
    #[error("Telemetry subscriber lagged: {missed} events dropped")]
    Lagged {
        /// Number of events lost
        missed: u64,
    },
}

/// Broadcast-backed telemetry sink
#[derive(Clone, Debug)]
pub struct ChannelTelemetry {
    tx: broadcast::Sender<TelemetryEvent>,
}

impl ChannelTelemetry {
    /// Create a sink with the default event capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a sink with an explicit event capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Open a stream over everything published from now on
    #[must_use]
    pub fn subscribe(&self) -> TelemetryStream {
        TelemetryStream {
            rx: self.tx.subscribe(),
        }
    }

    /// Subscribers currently listening
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn send(&self, event: TelemetryEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.tx.send(event);
    }
}

impl Default for ChannelTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for ChannelTelemetry {
    fn publish_heart_rate(&mut self, mean: i32) {
        self.send(TelemetryEvent::HeartRateMean(mean));
    }

    fn publish_gsr(&mut self, mean: i32) {
        self.send(TelemetryEvent::GsrMean(mean));
    }

    fn publish_state(&mut self, state: &str) {
        self.send(TelemetryEvent::State(state.to_string()));
    }

    fn publish_alert(&mut self, alert: &str) {
        self.send(TelemetryEvent::Alert(alert.to_string()));
    }
}

/// Subscriber half of [`ChannelTelemetry`]
pub struct TelemetryStream {
    rx: broadcast::Receiver<TelemetryEvent>,
}

impl TelemetryStream {
    /// Wait for the next event.
    ///
    /// A lagged subscriber gets [`StreamError::Lagged`] once, then resumes
    /// from the oldest retained event.
    pub async fn next_event(&mut self) -> Result<TelemetryEvent, StreamError> {
        match self.rx.recv().await {
            Ok(event) => Ok(event),
            Err(broadcast::error::RecvError::Closed) => Err(StreamError::Closed),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                Err(StreamError::Lagged { missed })
            }
        }
    }
}
