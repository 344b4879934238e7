//! Analog Front End Driver
//!
//! Driver for the band's two vitals channels using the TI ADS1115 ADC.
//! The optical pulse sensor and the GSR electrode pair share the chip as
//! single-ended inputs; every read is a single-shot conversion on the
//! requested channel.
//!
//! # Hardware Setup
//!
//! - ADS1115 16-bit ADC (I2C, ADDR pin to GND)
//! - Optical pulse sensor (photoplethysmography) on AIN0
//! - Ag/AgCl electrode pair with 0.5V DC excitation on AIN1
//!
//! # Example
//!
//! ```ignore
//! let mut afe = AfeDriver::new(i2c, delay, AFE_I2C_ADDR);
//! afe.init_with_retry(3)?;
//! let baseline = afe.calibrate(64)?;
//!
//! loop {
//!     let raw = afe.read_channel(AfeChannel::Gsr)?;
//!     // Feed the control loop...
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;

use affectlink_core::{Baseline, SensorError, SensorSource, SignalStats};

/// Default ADS1115 I2C address (ADDR pin to GND)
pub const AFE_I2C_ADDR: u8 = 0x48;

/// Maximum samples per channel a calibration run will take
pub const CALIBRATION_MAX_SAMPLES: usize = 128;

/// Pause between calibration sample pairs (ms)
const CALIBRATION_SAMPLE_GAP_MS: u32 = 10;

/// Pause between bring-up attempts (ms)
const INIT_RETRY_GAP_MS: u32 = 10;

/// Front-end error type
#[derive(Debug)]
pub enum AfeError<E> {
    /// I2C communication error
    I2c(E),
    /// Conversion still running after the data-rate wait
    NotReady,
    /// ADC value outside the valid single-ended range
    OutOfRange {
        /// Raw conversion register value
        raw: u16,
        /// Channel that produced it
        channel: AfeChannel,
    },
    /// Chip did not come up within the allowed attempts
    InitFailed {
        /// Attempts made before giving up
        attempts: u8,
    },
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for AfeError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::I2c(_) => defmt::write!(f, "i2c transfer failed"),
            Self::NotReady => defmt::write!(f, "conversion not ready"),
            Self::OutOfRange { raw, .. } => defmt::write!(f, "sample out of range: {}", raw),
            Self::InitFailed { attempts } => {
                defmt::write!(f, "init failed after {} attempts", attempts);
            }
        }
    }
}

impl<E> From<AfeError<E>> for SensorError {
    fn from(err: AfeError<E>) -> Self {
        match err {
            AfeError::I2c(_) | AfeError::InitFailed { .. } => Self::Bus,
            AfeError::NotReady => Self::NotReady,
            AfeError::OutOfRange { raw, .. } => Self::OutOfRange { raw },
        }
    }
}

/// ADS1115 register addresses
mod regs {
    pub const CONVERSION: u8 = 0x00;
    pub const CONFIG: u8 = 0x01;
}

/// ADS1115 configuration bits
mod config {
    /// Start single conversion (write) / conversion idle (read)
    pub const OS: u16 = 0x8000;
    /// Input multiplexer (AINp = AIN0, AINn = GND)
    pub const MUX_AIN0: u16 = 0x4000;
    pub const MUX_AIN1: u16 = 0x5000;
    /// Programmable gain: ±4.096V
    pub const PGA_4V: u16 = 0x0200;
    /// Single-shot mode
    pub const MODE_SINGLE: u16 = 0x0100;
    /// Comparator disable
    pub const COMP_DISABLE: u16 = 0x0003;
}

/// Measurement channel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AfeChannel {
    /// Optical pulse sensor on AIN0
    Pulse,
    /// GSR electrode pair on AIN1
    Gsr,
}

impl AfeChannel {
    /// MUX bits selecting this channel against GND
    const fn mux_bits(self) -> u16 {
        match self {
            Self::Pulse => config::MUX_AIN0,
            Self::Gsr => config::MUX_AIN1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AfeChannel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Pulse => defmt::write!(f, "pulse"),
            Self::Gsr => defmt::write!(f, "gsr"),
        }
    }
}

/// Conversion data rate
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AfeDataRate {
    /// 64 samples per second
    Sps64,
    /// 128 samples per second
    Sps128,
    /// 250 samples per second
    Sps250,
    /// 475 samples per second
    Sps475,
    /// 860 samples per second
    Sps860,
}

impl AfeDataRate {
    /// Get the ADS1115 data rate configuration bits
    fn config_bits(self) -> u16 {
        match self {
            Self::Sps64 => 0x0060,
            Self::Sps128 => 0x0080,
            Self::Sps250 => 0x00A0,
            Self::Sps475 => 0x00C0,
            Self::Sps860 => 0x00E0,
        }
    }

    /// Get rate in Hz
    pub fn hz(self) -> u16 {
        match self {
            Self::Sps64 => 64,
            Self::Sps128 => 128,
            Self::Sps250 => 250,
            Self::Sps475 => 475,
            Self::Sps860 => 860,
        }
    }

    /// Worst-case conversion time at this rate (µs)
    fn conversion_wait_us(self) -> u32 {
        match self {
            Self::Sps64 => 15_700,
            Self::Sps128 => 7_900,
            Self::Sps250 => 4_100,
            Self::Sps475 => 2_200,
            Self::Sps860 => 1_200,
        }
    }
}

impl Default for AfeDataRate {
    fn default() -> Self {
        // 200 Hz GSR sampling leaves a 5 ms budget per tick; 860 SPS keeps
        // two back-to-back conversions inside it.
        Self::Sps860
    }
}

/// Analog front end driver using the ADS1115
pub struct AfeDriver<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    data_rate: AfeDataRate,
}

impl<I2C, D, E> AfeDriver<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Create a new front end driver
    ///
    /// # Arguments
    ///
    /// * `i2c` - I2C bus
    /// * `delay` - Delay provider for conversion waits
    /// * `addr` - ADS1115 I2C address (typically 0x48-0x4B)
    #[must_use]
    pub fn new(i2c: I2C, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            data_rate: AfeDataRate::default(),
        }
    }

    /// Set the conversion data rate
    pub fn set_data_rate(&mut self, rate: AfeDataRate) {
        self.data_rate = rate;
    }

    /// Initialize the front end
    pub fn init(&mut self) -> Result<(), AfeError<E>> {
        // Verify ADS1115 by reading the config register
        self.read_register(regs::CONFIG)?;

        // Park on the pulse channel: single-shot mode, ±4.096V range
        let base_config = config::PGA_4V | config::MODE_SINGLE | config::COMP_DISABLE;
        self.write_config(base_config | config::MUX_AIN0 | self.data_rate.config_bits())?;

        Ok(())
    }

    /// Initialize with bounded retries
    ///
    /// The ADS1115 shares its bus with other peripherals and may miss the
    /// first address after power-on. Retries `attempts` times with a short
    /// pause, then reports [`AfeError::InitFailed`].
    pub fn init_with_retry(&mut self, attempts: u8) -> Result<(), AfeError<E>> {
        for _ in 0..attempts {
            if self.init().is_ok() {
                return Ok(());
            }
            self.delay.delay_ms(INIT_RETRY_GAP_MS);
        }
        Err(AfeError::InitFailed { attempts })
    }

    /// Take one single-shot conversion on a channel
    ///
    /// Returns the raw conversion register value. Negative codes (input
    /// below ground) and full-scale codes (rail) are rejected as
    /// [`AfeError::OutOfRange`].
    pub fn read_channel(&mut self, channel: AfeChannel) -> Result<u16, AfeError<E>> {
        let config_val = config::OS
            | channel.mux_bits()
            | config::PGA_4V
            | config::MODE_SINGLE
            | self.data_rate.config_bits()
            | config::COMP_DISABLE;

        self.write_config(config_val)?;
        self.delay.delay_us(self.data_rate.conversion_wait_us());

        // OS reads 1 once the conversion has finished
        if self.read_register(regs::CONFIG)? & config::OS == 0 {
            return Err(AfeError::NotReady);
        }

        let raw = self.read_register(regs::CONVERSION)?;
        if (raw as i16) < 0 || raw == 0x7FFF {
            return Err(AfeError::OutOfRange { raw, channel });
        }

        Ok(raw)
    }

    /// Measure a resting baseline for both channels
    ///
    /// Samples each channel `samples_per_channel` times (clamped to
    /// [`CALIBRATION_MAX_SAMPLES`]) and reduces each run to mean and
    /// population standard deviation. Should be called while the wearer
    /// is seated and relaxed.
    pub fn calibrate(&mut self, samples_per_channel: u16) -> Result<Baseline, AfeError<E>> {
        let count = (samples_per_channel.max(1) as usize).min(CALIBRATION_MAX_SAMPLES);

        let mut pulse: Vec<u16, CALIBRATION_MAX_SAMPLES> = Vec::new();
        let mut gsr: Vec<u16, CALIBRATION_MAX_SAMPLES> = Vec::new();

        for _ in 0..count {
            let _ = pulse.push(self.read_channel(AfeChannel::Pulse)?);
            let _ = gsr.push(self.read_channel(AfeChannel::Gsr)?);
            self.delay.delay_ms(CALIBRATION_SAMPLE_GAP_MS);
        }

        Ok(Baseline::new(
            SignalStats::from_samples(&pulse),
            SignalStats::from_samples(&gsr),
        ))
    }

    /// Consume the driver and return the hardware handles
    #[must_use]
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn write_config(&mut self, config: u16) -> Result<(), AfeError<E>> {
        let bytes = config.to_be_bytes();
        self.i2c
            .write(self.addr, &[regs::CONFIG, bytes[0], bytes[1]])
            .map_err(AfeError::I2c)
    }

    fn read_register(&mut self, reg: u8) -> Result<u16, AfeError<E>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .map_err(AfeError::I2c)?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<I2C, D, E> SensorSource for AfeDriver<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    fn read_heart_rate(&mut self) -> Result<u16, SensorError> {
        self.read_channel(AfeChannel::Pulse).map_err(Into::into)
    }

    fn read_gsr(&mut self) -> Result<u16, SensorError> {
        self.read_channel(AfeChannel::Gsr).map_err(Into::into)
    }
}

// ============================================================================
// Tests
// ============================================================================
