//! AffectLink Native - Host-side sessions and telemetry streaming
//!
//! This crate runs the AffectLink control loop off-device:
//! - Wall-clock and manually driven clocks
//! - Deterministic simulated vitals, with an optional stress onset
//! - Broadcast-backed telemetry for dashboards and tests
//! - Session runners in realtime and accelerated flavors
//!
//! # Modules
//!
//! - [`clock`]: [`ClockSource`](affectlink_core::ClockSource) implementations
//! - [`sim`]: Simulated sensor source
//! - [`telemetry`]: Telemetry fan-out over tokio broadcast channels
//! - [`session`]: Drive a controller for a fixed duration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod clock;
pub mod session;
pub mod sim;
pub mod telemetry;

// Re-export key types
pub use clock::{ManualClock, SystemClock};
pub use session::{run_accelerated, run_realtime, SessionSummary};
pub use sim::{SimProfile, SimulatedSensors};
pub use telemetry::{ChannelTelemetry, StreamError, TelemetryEvent, TelemetryStream};
