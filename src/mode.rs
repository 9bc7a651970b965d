//! Measurement profiles.
use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;

use crate::comm::{Read, Write};
use crate::config::{
    FINAL_RANGE_TIMEOUT_OVERRIDE, INTER_MEASUREMENT_PERIOD_MS, SIGNAL_RATE_LIMIT_MCPS,
    VCSEL_PERIODS,
};
use crate::register::Register;
use crate::{Error, VL53L0X};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Profile {
    /// 30 ms, up to 1.2 m
    #[default]
    Default = 0,
    /// 200 ms, up to 1.2 m
    HighAccuracy = 1,
    /// 33 ms, up to 2 m
    LongRange = 2,
    /// 20 ms, up to 1.2 m
    HighSpeed = 3,
}

impl Profile {
    fn index(self) -> usize {
        self as usize
    }

    pub fn inter_measurement_period_ms(self) -> u32 {
        INTER_MEASUREMENT_PERIOD_MS[self.index()]
    }

    pub fn signal_rate_limit_mcps(self) -> f32 {
        SIGNAL_RATE_LIMIT_MCPS[self.index()]
    }

    /// (pre-range, final range) VCSEL periods in PCLKs.
    pub fn vcsel_periods(self) -> (u8, u8) {
        VCSEL_PERIODS[self.index()]
    }

    /// Final range timeout written over the one derived from the VCSEL periods.
    pub fn final_range_timeout_override(self) -> Option<u16> {
        FINAL_RANGE_TIMEOUT_OVERRIDE[self.index()]
    }
}

impl<I2C, E, D> VL53L0X<I2C, D>
where
    I2C: Read<Error = E> + Write<Error = E>,
    E: Debug,
    D: DelayMs<u32>,
{
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Switch to another measurement profile.
    ///
    /// The profile is only recorded once every register write succeeded.
    pub fn set_mode(&mut self, profile: Profile) -> Result<(), Error<E>> {
        info!("Setting profile {}", profile.index());
        self.write_stop_variable()?;

        self.set_signal_rate_limit(profile.signal_rate_limit_mcps())?;
        let (pre_range, final_range) = profile.vcsel_periods();
        self.set_vcsel_periods(pre_range, final_range)?;
        if let Some(timeout) = profile.final_range_timeout_override() {
            self.write_word(Register::FinalRangeConfigTimeoutMacropHi, timeout)?;
        }

        self.write_dword(
            Register::SystemIntermeasurementPeriod,
            profile.inter_measurement_period_ms(),
        )?;
        self.profile = profile;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_periods() {
        assert_eq!(Profile::Default.inter_measurement_period_ms(), 30);
        assert_eq!(Profile::HighAccuracy.inter_measurement_period_ms(), 200);
        assert_eq!(Profile::LongRange.inter_measurement_period_ms(), 33);
        assert_eq!(Profile::HighSpeed.inter_measurement_period_ms(), 20);
    }

    #[test]
    fn only_long_range_changes_vcsel_periods() {
        assert_eq!(Profile::LongRange.vcsel_periods(), (18, 14));
        for profile in [Profile::Default, Profile::HighAccuracy, Profile::HighSpeed] {
            assert_eq!(profile.vcsel_periods(), (14, 10));
        }
    }

    #[test]
    fn timeout_overrides() {
        assert_eq!(Profile::Default.final_range_timeout_override(), None);
        assert_eq!(Profile::LongRange.final_range_timeout_override(), None);
        assert_eq!(Profile::HighAccuracy.final_range_timeout_override(), Some(0x059A));
        assert_eq!(Profile::HighSpeed.final_range_timeout_override(), Some(0x00D5));
    }
}
