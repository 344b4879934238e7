//! Hardware drivers for vitals acquisition
//!
//! This module contains drivers for the band's hardware components:
//! - [`afe`]: TI ADS1115 analog front end (pulse + GSR channels)

pub mod afe;
