//! AffectLink Embedded - wearable drivers and BLE telemetry
//!
//! This crate provides the hardware-facing half of the AffectLink platform:
//! - ADS1115 analog front end driver (I2C) for the pulse and GSR channels
//! - BLE GATT service definitions for vitals and alert delivery
//! - A [`TelemetrySink`](affectlink_core::TelemetrySink) backed by a bounded
//!   notification queue, safe to drain from the radio task
//!
//! # Hardware Requirements
//!
//! - ESP32-WROOM-DA (as used in the AffectLink band)
//! - TI ADS1115 16-bit ADC for both analog channels
//! - Optical pulse sensor (photoplethysmography) on AIN0
//! - Ag/AgCl finger electrodes with 0.5V excitation on AIN1
//!
//! # GPIO Assignments
//!
//! ```text
//! I2C (ADS1115):  SDA=21, SCL=22, ADDR=GND (0x48)
//! ALERT/RDY:      GPIO 4 (unused, conversions are polled)
//! Status LED:     GPIO 17
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[cfg(test)]
extern crate std;

pub mod ble;
pub mod drivers;

// Re-export the analog front end driver
pub use drivers::afe::{AfeChannel, AfeDataRate, AfeDriver, AfeError};

// Re-export BLE service definitions
pub use ble::{
    BleTelemetry, LinkState, Notification, ALERT_CHAR_UUID, ALERT_VALUE_MAX_LEN,
    GSR_MEAN_CHAR_UUID, HEART_RATE_MEAN_CHAR_UUID, NOTIFY_QUEUE_DEPTH, STATE_CHAR_UUID,
    STATE_VALUE_MAX_LEN, VITALS_SERVICE_UUID,
};
