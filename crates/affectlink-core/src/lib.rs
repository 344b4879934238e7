//! AffectLink Core - `no_std` sampling and classification engine
//!
//! This crate provides the sampling buffers, rolling statistics, and
//! two-tier emotional-state classification logic for the AffectLink
//! wearable. It is designed to work in `no_std` environments (the device
//! firmware) as well as `std` environments (host-side simulation and
//! tooling).
//!
//! # Modules
//!
//! - [`types`]: Core data types (states, per-channel statistics, baseline)
//! - [`ring`]: Fixed-capacity circular sample buffers
//! - [`math`]: Mean and population standard deviation
//! - [`classify`]: Threshold classification against a resting baseline
//! - [`hysteresis`]: Consecutive-cycle counters and the valid-period rule
//! - [`sched`]: Due-instant cadence tracking for the acquisition loop
//! - [`controller`]: The long-lived control object tying it all together
//! - [`hal`]: Traits the controller needs from sensors, clock, telemetry
//! - [`error`]: Error types for sensor faults
//! - [`config`]: Sample rates, window sizes, and controller configuration
//!
//! # Features
//!
//! - `std`: Enable standard library support
//! - `defmt`: Enable `defmt` formatting for embedded logging
//!
//! # Example
//!
//! ```rust
//! use affectlink_core::{SampleRing, SignalStats};
//!
//! let mut ring: SampleRing<u16, 4> = SampleRing::new();
//! for _ in 0..4 {
//!     ring.push(80);
//! }
//! let stats = SignalStats::from_samples(ring.as_slice());
//! assert!((stats.mean - 80.0).abs() < f32::EPSILON);
//! assert_eq!(stats.std_dev, 0.0);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod hysteresis;
pub mod math;
pub mod ring;
pub mod sched;
pub mod types;

// Re-export commonly used types at crate root
pub use classify::AffectClassifier;
pub use config::{ControllerConfig, GSR_WINDOW_SAMPLES, HR_WINDOW_SAMPLES};
pub use controller::{AffectController, PollOutcome};
pub use error::SensorError;
pub use hal::{ClockSource, SensorSource, TelemetrySink};
pub use hysteresis::HysteresisTracker;
pub use ring::SampleRing;
pub use sched::{Cadence, Due, SampleScheduler};
pub use types::{AffectState, Baseline, SignalStats, VitalsStats};
