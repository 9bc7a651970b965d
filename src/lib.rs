//! # VL53L0X Time-of-Flight Distance Sensor Driver
//!
//! Blocking, `no_std` driver for the VL53L0X built on the `embedded-hal` 0.2
//! I2C and delay traits.
//!
//! ```rust,no_run
//! use vl53l0x_tof::{IOVoltage, Profile, VL53L0X, DEFAULT_ADDRESS};
//!
//! let i2c = embedded_hal_mock::i2c::Mock::new(&[]);
//! let delay = embedded_hal_mock::delay::MockNoop::new();
//! let mut tof = VL53L0X::new(i2c, delay, DEFAULT_ADDRESS);
//!
//! tof.initialize(IOVoltage::Volt2_8, Profile::Default);
//!
//! if tof.is_initialized() {
//!     if let Ok(Some(measurement)) = tof.update() {
//!         println!("{} mm", measurement.range_mm());
//!     }
//! }
//! ```
#![no_std]

mod fmt; // <-- must be first module!

use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;

pub mod calibration;
pub mod comm;
pub mod config;
pub mod measurement;
pub mod mode;
pub mod register;
pub mod timing;

pub use calibration::Calibration;
use comm::{Read, Write};
pub use measurement::{Measurement, RangeStatus, INVALID_RANGE};
pub use mode::Profile;
pub use timing::VcselTiming;
use measurement::RESULT_BUFFER_LEN;
use register::*;

/// Address of the sensor after power up.
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Timeout used for single shot measurements when the caller has no preference.
pub const DEFAULT_SINGLE_SHOT_TIMEOUT_MS: u32 = 1000;

pub(crate) const POLL_INTERVAL_MS: u32 = 1;

/// I/O pad supply of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IOVoltage {
    /// 1.6V - 1.9V
    Volt1_8,
    /// 2.6V - 3.5V
    Volt2_8,
}

/// Lifecycle of a [`VL53L0X`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Uninitialized,
    BringingUp,
    Ready,
}

/// Bring-up step, reported by [`InitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Identify,
    IoVoltage,
    StopVariable,
    MsrcControl,
    DefaultConfiguration,
    InterruptConfig,
    SequenceSteps,
    VhvCalibration,
    PhaseCalibration,
    Mode,
    StartContinuous,
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Driver errors.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: Debug> {
    /// Underlying bus error.
    Bus(E),
    /// Polling for the device exceeded its deadline.
    Timeout,
    /// The model identification register holds an unexpected value.
    InvalidModelId(u8),
    /// VCSEL period that is odd or outside the legal range.
    InvalidVcselPeriod(u8),
    /// Signal rate limit outside `[0, 512)` MCPS.
    InvalidSignalRateLimit,
    /// Reserved 7-bit address (outside 0x08 - 0x77).
    InvalidAddress(u8),
    /// The operation requires a fully initialized device.
    NotReady,
}

impl<E: Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl<E: Debug> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

/// Failed bring-up, with the step that failed.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitError<E: Debug> {
    pub stage: Stage,
    pub error: Error<E>,
}

impl<E: Debug> core::fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

trait During<T, E: Debug> {
    fn during(self, stage: Stage) -> Result<T, InitError<E>>;
}

impl<T, E: Debug> During<T, E> for Result<T, Error<E>> {
    fn during(self, stage: Stage) -> Result<T, InitError<E>> {
        self.map_err(|error| InitError { stage, error })
    }
}

/// Handle for one VL53L0X.
///
/// The handle owns the bus and the delay provider, all calls are serialized
/// through `&mut self`.
pub struct VL53L0X<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    stop_variable: u8,
    profile: Profile,
    state: State,
    range_mm: i32,
    status: RangeStatus,
}

impl<I2C, E, D> VL53L0X<I2C, D>
where
    I2C: Read<Error = E> + Write<Error = E>,
    E: Debug,
    D: DelayMs<u32>,
{
    /// Create a new handle, no bus traffic happens until [`initialize`](Self::initialize).
    ///
    /// # Arguments
    ///
    /// * `i2c` - The bus the sensor is attached to.
    /// * `delay` - Delay provider used between poll attempts.
    /// * `address` - The 7-bit address of the sensor, usually [`DEFAULT_ADDRESS`].
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        VL53L0X {
            i2c,
            delay,
            address,
            stop_variable: 0xFF,
            profile: Profile::Default,
            state: State::Uninitialized,
            range_mm: 0,
            status: RangeStatus::Unknown,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == State::Ready
    }

    /// Program a new 7-bit address into the sensor and use it for all further transfers.
    ///
    /// The address is lost when the sensor is powered off.
    pub fn set_address(&mut self, new_address: u8) -> Result<(), Error<E>> {
        if !(0x08..=0x77).contains(&new_address) {
            error!("Invalid address: {}", new_address);
            return Err(Error::InvalidAddress(new_address));
        }
        self.write_byte(Register::I2cSlaveDeviceAddress, new_address & 0x7F)?;
        self.address = new_address;
        Ok(())
    }

    pub fn model_id(&mut self) -> Result<u8, Error<E>> {
        self.read_byte(Register::IdentificationModelId)
    }

    /// Check the model identification register, a bus error counts as not connected.
    pub fn is_connected(&mut self) -> bool {
        matches!(self.model_id(), Ok(MODEL_ID))
    }

    /// Bring the sensor up and start continuous ranging with `profile`.
    ///
    /// Failures are not reported: check [`is_initialized`](Self::is_initialized)
    /// afterwards, or use [`try_initialize`](Self::try_initialize) to learn which
    /// step failed.
    pub fn initialize(&mut self, voltage: IOVoltage, profile: Profile) {
        if let Err(e) = self.try_initialize(voltage, profile) {
            warn!("Bring-up aborted during {}", e.stage);
        }
    }

    /// Bring the sensor up and start continuous ranging with `profile`.
    ///
    /// On any failure the handle is left [`State::Uninitialized`] and the device
    /// state is undefined; reset and initialize again.
    ///
    /// # Errors
    ///
    /// The failing [`Stage`] together with its cause. A wrong chip is reported as
    /// [`Error::InvalidModelId`] during [`Stage::Identify`].
    pub fn try_initialize(
        &mut self,
        voltage: IOVoltage,
        profile: Profile,
    ) -> Result<(), InitError<E>> {
        self.state = State::BringingUp;
        let result = self.bring_up(voltage, profile);
        self.state = match result {
            Ok(()) => State::Ready,
            Err(_) => State::Uninitialized,
        };
        result
    }

    fn bring_up(&mut self, voltage: IOVoltage, profile: Profile) -> Result<(), InitError<E>> {
        info!("Checking model id");
        let id = self.model_id().during(Stage::Identify)?;
        if id != MODEL_ID {
            return Err(InitError {
                stage: Stage::Identify,
                error: Error::InvalidModelId(id),
            });
        }

        self.write_byte(
            Register::VhvConfigPadSclSdaExtsupHv,
            u8::from(voltage == IOVoltage::Volt2_8),
        )
        .during(Stage::IoVoltage)?;

        self.capture_stop_variable().during(Stage::StopVariable)?;
        debug!("Stop variable: {}", self.stop_variable);

        let msrc = self.read_byte(Register::MsrcConfigControl).during(Stage::MsrcControl)?;
        self.write_byte(Register::MsrcConfigControl, msrc | MSRC_CONFIG_CONTROL_LIMIT_CHECKS)
            .during(Stage::MsrcControl)?;

        info!("Loading default configuration");
        self.apply_default_configuration()
            .during(Stage::DefaultConfiguration)?;

        self.configure_interrupt().during(Stage::InterruptConfig)?;

        self.write_byte(Register::SystemSequenceConfig, SEQUENCE_STEPS)
            .during(Stage::SequenceSteps)?;

        info!("Running reference calibration");
        self.perform_reference_calibration(Calibration::Vhv)
            .during(Stage::VhvCalibration)?;
        self.perform_reference_calibration(Calibration::Phase)
            .during(Stage::PhaseCalibration)?;

        self.write_byte(Register::SystemSequenceConfig, SEQUENCE_STEPS)
            .during(Stage::SequenceSteps)?;

        self.set_mode(profile).during(Stage::Mode)?;
        self.start_continuous().during(Stage::StartContinuous)?;
        info!("Sensor ready");
        Ok(())
    }

    /// Apply [`config::DEFAULT_CONFIGURATION`] in order, stopping at the first failed write.
    pub fn apply_default_configuration(&mut self) -> Result<(), Error<E>> {
        for &(register, value) in config::DEFAULT_CONFIGURATION.iter() {
            self.write_byte(register, value)?;
        }
        Ok(())
    }

    fn capture_stop_variable(&mut self) -> Result<(), Error<E>> {
        // standard i2c mode
        self.write_byte(0x88u8, 0x00)?;
        self.write_byte(0x80u8, 0x01)?;
        self.write_byte(Register::PageSelect, PAGE_1)?;
        self.write_byte(0x00u8, 0x00)?;
        self.stop_variable = self.read_byte(Register::StopVariable)?;
        self.write_byte(0x00u8, 0x01)?;
        self.write_byte(Register::PageSelect, PAGE_0)?;
        self.write_byte(0x80u8, 0x00)?;
        Ok(())
    }

    /// Write the captured stop variable back, required before starting a measurement
    /// or changing the timing.
    pub(crate) fn write_stop_variable(&mut self) -> Result<(), Error<E>> {
        self.write_byte(0x80u8, 0x01)?;
        self.write_byte(Register::PageSelect, PAGE_1)?;
        self.write_byte(0x00u8, 0x00)?;
        self.write_byte(Register::StopVariable, self.stop_variable)?;
        self.write_byte(0x00u8, 0x01)?;
        self.write_byte(Register::PageSelect, PAGE_0)?;
        self.write_byte(0x80u8, 0x00)?;
        Ok(())
    }

    fn configure_interrupt(&mut self) -> Result<(), Error<E>> {
        let mux = self.read_byte(Register::GpioHvMuxActiveHigh)?;
        self.write_byte(Register::SystemInterruptConfigGpio, GPIO_INTERRUPT_NEW_SAMPLE_READY)?;
        self.write_byte(Register::GpioHvMuxActiveHigh, mux & !GPIO_HV_MUX_POLARITY)?;
        self.clear_interrupt()
    }

    /// Start back-to-back ranging.
    pub fn start_continuous(&mut self) -> Result<(), Error<E>> {
        self.write_stop_variable()?;
        self.write_byte(Register::SysRangeStart, RANGE_START_BACK_TO_BACK)?;
        self.clear_interrupt()
    }

    pub fn stop_continuous(&mut self) -> Result<(), Error<E>> {
        self.write_byte(Register::SysRangeStart, RANGE_START_SINGLE)?;
        self.write_byte(Register::PageSelect, PAGE_1)?;
        self.write_byte(0x00u8, 0x00)?;
        self.write_byte(Register::StopVariable, 0x00)?;
        self.write_byte(Register::PageSelect, PAGE_0)?;
        Ok(())
    }

    pub fn clear_interrupt(&mut self) -> Result<(), Error<E>> {
        self.write_byte(Register::SystemInterruptClear, 0x01)
    }

    pub fn is_data_ready(&mut self) -> Result<bool, Error<E>> {
        let status = self.read_byte(Register::ResultInterruptStatus)?;
        Ok(status & INTERRUPT_STATUS_MASK != 0)
    }

    fn read_measurement(&mut self) -> Result<Measurement, Error<E>> {
        let mut buffer = [0u8; RESULT_BUFFER_LEN];
        self.read_buffer(Register::ResultRangeStatus, &mut buffer)?;
        let measurement = Measurement::from_result_buffer(&buffer);
        trace!("Range status code {}", measurement.status_code());

        self.range_mm = measurement.range_mm();
        self.status = measurement.range_status();
        Ok(measurement)
    }

    /// Fetch a new measurement if one is available, never blocks.
    ///
    /// Does nothing until the handle is [`State::Ready`]. The decoded result is
    /// also kept in the handle, see [`distance_mm`](Self::distance_mm).
    pub fn update(&mut self) -> Result<Option<Measurement>, Error<E>> {
        if self.state != State::Ready {
            return Ok(None);
        }

        if !self.is_data_ready()? {
            return Ok(None);
        }

        let measurement = self.read_measurement()?;
        self.clear_interrupt()?;
        Ok(Some(measurement))
    }

    /// Single shot measurement, returns the distance in millimeters or
    /// [`INVALID_RANGE`] on any failure.
    ///
    /// Once a result has been read, the returned value is the one recorded in
    /// the handle even if clearing the interrupt afterwards fails.
    pub fn measure_single(&mut self, timeout_ms: u32) -> i32 {
        match self.single_shot(timeout_ms) {
            Ok(measurement) => {
                if self.clear_interrupt().is_err() {
                    warn!("Interrupt clear failed after single shot");
                }
                measurement.range_mm()
            }
            Err(Error::NotReady) => INVALID_RANGE,
            Err(_) => {
                warn!("Single shot measurement failed");
                INVALID_RANGE
            }
        }
    }

    /// Single shot measurement.
    ///
    /// Both the trigger and the result are polled every millisecond for at most
    /// `timeout_ms`. After a timeout the device needs a reset.
    ///
    /// A failed interrupt clear is reported as an error, the measurement read
    /// before it is still recorded in the handle.
    pub fn try_measure_single(&mut self, timeout_ms: u32) -> Result<Measurement, Error<E>> {
        let measurement = self.single_shot(timeout_ms)?;
        self.clear_interrupt()?;
        Ok(measurement)
    }

    fn single_shot(&mut self, timeout_ms: u32) -> Result<Measurement, Error<E>> {
        if self.state != State::Ready {
            return Err(Error::NotReady);
        }

        self.write_stop_variable()?;
        self.write_byte(Register::SysRangeStart, RANGE_START_SINGLE)?;

        self.poll_until(timeout_ms, |dev| {
            Ok(dev.read_byte(Register::SysRangeStart)? & RANGE_START_SINGLE == 0)
        })?;
        self.poll_until(timeout_ms, |dev| dev.is_data_ready())?;

        self.read_measurement()
    }

    /// Soft reset the sensor. The handle is uninitialized afterwards, even when
    /// the reset could not be written.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        let result = self.soft_reset();
        self.state = State::Uninitialized;
        result
    }

    fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.write_byte(Register::SoftResetGo2SoftResetN, 0x00)?;
        self.delay.delay_ms(1);
        self.write_byte(Register::SoftResetGo2SoftResetN, 0x01)?;
        self.delay.delay_ms(1);
        Ok(())
    }

    /// Last distance in millimeters, [`INVALID_RANGE`] if it was not valid.
    pub fn distance_mm(&self) -> i32 {
        self.range_mm
    }

    /// Last distance in centimeters, [`INVALID_RANGE`] if it was not valid.
    pub fn distance_cm(&self) -> i32 {
        if self.range_mm >= 0 {
            self.range_mm / 10
        } else {
            INVALID_RANGE
        }
    }

    pub fn is_valid(&self) -> bool {
        self.range_mm >= 0
    }

    pub fn range_status(&self) -> RangeStatus {
        self.status
    }

    /// Poll `done` every [`POLL_INTERVAL_MS`] until it holds or `timeout_ms` elapsed.
    ///
    /// Only the time spent in the delay provider is counted, bus transfers
    /// are not, so the wall clock duration can exceed `timeout_ms`.
    pub(crate) fn poll_until<F>(&mut self, timeout_ms: u32, mut done: F) -> Result<(), Error<E>>
    where
        F: FnMut(&mut Self) -> Result<bool, Error<E>>,
    {
        let mut elapsed_ms = 0u32;
        loop {
            if done(&mut *self)? {
                return Ok(());
            }

            if elapsed_ms >= timeout_ms {
                return Err(Error::Timeout);
            }

            self.delay.delay_ms(POLL_INTERVAL_MS);
            elapsed_ms = elapsed_ms.saturating_add(POLL_INTERVAL_MS);
        }
    }

    pub(crate) fn write_byte<R>(&mut self, register: R, value: u8) -> Result<(), Error<E>>
    where
        R: Into<u8>,
    {
        self.i2c.write_registers(self.address, register.into(), &[value])?;
        Ok(())
    }

    pub(crate) fn write_word<R>(&mut self, register: R, value: u16) -> Result<(), Error<E>>
    where
        R: Into<u8>,
    {
        self.i2c
            .write_registers(self.address, register.into(), &value.to_be_bytes())?;
        Ok(())
    }

    pub(crate) fn write_dword<R>(&mut self, register: R, value: u32) -> Result<(), Error<E>>
    where
        R: Into<u8>,
    {
        self.i2c
            .write_registers(self.address, register.into(), &value.to_be_bytes())?;
        Ok(())
    }

    pub(crate) fn read_byte<R>(&mut self, register: R) -> Result<u8, Error<E>>
    where
        R: Into<u8>,
    {
        let mut buffer = [0u8; 1];
        self.i2c.read_registers(self.address, register.into(), &mut buffer)?;
        Ok(buffer[0])
    }

    pub(crate) fn read_word<R>(&mut self, register: R) -> Result<u16, Error<E>>
    where
        R: Into<u8>,
    {
        let mut buffer = [0u8; 2];
        self.i2c.read_registers(self.address, register.into(), &mut buffer)?;
        Ok(u16::from_be_bytes(buffer))
    }

    pub(crate) fn read_buffer<R>(&mut self, register: R, buffer: &mut [u8]) -> Result<(), Error<E>>
    where
        R: Into<u8>,
    {
        self.i2c.read_registers(self.address, register.into(), buffer)?;
        Ok(())
    }
}
