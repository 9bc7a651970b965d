//! Reference calibration passes.
use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;

use crate::comm::{Read, Write};
use crate::register::Register;
use crate::{Error, VL53L0X};

/// Upper bound for a single calibration pass.
pub const CALIBRATION_TIMEOUT_MS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Calibration {
    /// Temperature dependent voltage reference.
    Vhv,
    /// Phase reference, needed again after every VCSEL period change.
    Phase,
}

impl Calibration {
    fn sequence_config(self) -> u8 {
        match self {
            Calibration::Vhv => 0x01,
            Calibration::Phase => 0x02,
        }
    }

    fn range_start(self) -> u8 {
        match self {
            Calibration::Vhv => 0x41,
            Calibration::Phase => 0x01,
        }
    }
}

impl<I2C, E, D> VL53L0X<I2C, D>
where
    I2C: Read<Error = E> + Write<Error = E>,
    E: Debug,
    D: DelayMs<u32>,
{
    /// Run one reference calibration pass and wait for it to finish.
    ///
    /// Leaves [`Register::SystemSequenceConfig`] selecting only the calibration
    /// step, callers restore the ranging sequence.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the device does not signal completion within
    /// [`CALIBRATION_TIMEOUT_MS`].
    pub fn perform_reference_calibration(
        &mut self,
        calibration: Calibration,
    ) -> Result<(), Error<E>> {
        debug!("Reference calibration, sequence {}", calibration.sequence_config());
        self.write_byte(Register::SystemSequenceConfig, calibration.sequence_config())?;
        self.write_byte(Register::SysRangeStart, calibration.range_start())?;

        self.poll_until(CALIBRATION_TIMEOUT_MS, |dev| dev.is_data_ready())?;

        self.clear_interrupt()?;
        self.write_byte(Register::SysRangeStart, 0x00)
    }
}
