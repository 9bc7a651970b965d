//! VCSEL period and signal rate limit configuration.
use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;
use fixed::types::U9F7;

use crate::calibration::Calibration;
use crate::comm::{Read, Write};
use crate::config::{
    final_range_index, pre_range_index, FINAL_RANGE_VALUES, PRE_AND_FINAL_TIMEOUT_MACROP,
    PRE_RANGE_MSRC_TIMEOUT, PRE_RANGE_PHASE_HIGH, PRE_RANGE_PHASE_LOW, PRE_RANGE_TIMEOUT_MACROP,
};
use crate::register::{Register, PAGE_0, PAGE_1};
use crate::{Error, VL53L0X};

/// Register values for one pre-range/final range VCSEL period pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VcselTiming {
    pub pre_range_vcsel_period: u8,
    pub pre_range_phase_high: u8,
    pub pre_range_phase_low: u8,
    pub pre_range_timeout: u16,
    pub msrc_timeout: u8,
    pub final_range_vcsel_period: u8,
    pub final_range_phase_high: u8,
    pub final_range_phase_low: u8,
    pub vcsel_width: u8,
    pub phasecal_timeout: u8,
    pub phasecal_limit: u8,
    pub final_range_timeout: u16,
}

/// Register encoding of a VCSEL period in PCLKs.
pub fn encode_vcsel_period(period: u8) -> u8 {
    (period >> 1) - 1
}

impl VcselTiming {
    /// Look up the register values for a period pair.
    ///
    /// Returns `None` unless `pre_range_period` is even in `12..=18` and
    /// `final_range_period` is even in `8..=14`.
    pub fn new(pre_range_period: u8, final_range_period: u8) -> Option<Self> {
        let pre = pre_range_index(pre_range_period)?;
        let fin = final_range_index(final_range_period)?;
        let [phase_high, phase_low, vcsel_width, phasecal_timeout, phasecal_limit] =
            FINAL_RANGE_VALUES[fin];

        Some(VcselTiming {
            pre_range_vcsel_period: encode_vcsel_period(pre_range_period),
            pre_range_phase_high: PRE_RANGE_PHASE_HIGH[pre],
            pre_range_phase_low: PRE_RANGE_PHASE_LOW,
            pre_range_timeout: PRE_RANGE_TIMEOUT_MACROP[pre],
            msrc_timeout: PRE_RANGE_MSRC_TIMEOUT[pre],
            final_range_vcsel_period: encode_vcsel_period(final_range_period),
            final_range_phase_high: phase_high,
            final_range_phase_low: phase_low,
            vcsel_width,
            phasecal_timeout,
            phasecal_limit,
            final_range_timeout: PRE_AND_FINAL_TIMEOUT_MACROP[pre][fin],
        })
    }
}

impl<I2C, E, D> VL53L0X<I2C, D>
where
    I2C: Read<Error = E> + Write<Error = E>,
    E: Debug,
    D: DelayMs<u32>,
{
    /// Set the pre-range and final range VCSEL periods (in PCLKs) and recalibrate the phase.
    ///
    /// Both periods are validated before anything is written. A failure after
    /// that leaves the device half configured, the sequence config is not
    /// restored and the sensor needs to be initialized again.
    pub fn set_vcsel_periods(
        &mut self,
        pre_range_period: u8,
        final_range_period: u8,
    ) -> Result<(), Error<E>> {
        let timing = VcselTiming::new(pre_range_period, final_range_period).ok_or_else(|| {
            error!("Invalid VCSEL periods: {} {}", pre_range_period, final_range_period);
            if pre_range_index(pre_range_period).is_none() {
                Error::InvalidVcselPeriod(pre_range_period)
            } else {
                Error::InvalidVcselPeriod(final_range_period)
            }
        })?;

        self.write_byte(Register::PreRangeConfigValidPhaseHigh, timing.pre_range_phase_high)?;
        self.write_byte(Register::PreRangeConfigValidPhaseLow, timing.pre_range_phase_low)?;
        self.write_byte(Register::PreRangeConfigVcselPeriod, timing.pre_range_vcsel_period)?;
        self.write_word(Register::PreRangeConfigTimeoutMacropHi, timing.pre_range_timeout)?;
        self.write_byte(Register::MsrcConfigTimeoutMacrop, timing.msrc_timeout)?;

        self.write_byte(Register::FinalRangeConfigValidPhaseHigh, timing.final_range_phase_high)?;
        self.write_byte(Register::FinalRangeConfigValidPhaseLow, timing.final_range_phase_low)?;
        self.write_byte(Register::GlobalConfigVcselWidth, timing.vcsel_width)?;
        self.write_byte(Register::AlgoPhasecalConfigTimeout, timing.phasecal_timeout)?;
        // phase calibration limit shares its index with the timeout, on page 1
        self.write_byte(Register::PageSelect, PAGE_1)?;
        self.write_byte(Register::AlgoPhasecalConfigTimeout, timing.phasecal_limit)?;
        self.write_byte(Register::PageSelect, PAGE_0)?;
        self.write_byte(Register::FinalRangeConfigVcselPeriod, timing.final_range_vcsel_period)?;
        self.write_word(Register::FinalRangeConfigTimeoutMacropHi, timing.final_range_timeout)?;

        let sequence_config = self.read_byte(Register::SystemSequenceConfig)?;
        self.perform_reference_calibration(Calibration::Phase)?;
        self.write_byte(Register::SystemSequenceConfig, sequence_config)
    }

    /// Set the minimum return signal rate of the final range in MCPS.
    ///
    /// The register holds a 9.7 fixed point value, fractions below 1/128 MCPS are dropped.
    pub fn set_signal_rate_limit(&mut self, mcps: f32) -> Result<(), Error<E>> {
        if !(0.0..512.0).contains(&mcps) {
            error!("Invalid signal rate limit: {}", mcps);
            return Err(Error::InvalidSignalRateLimit);
        }

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let limit = U9F7::from_bits((mcps * 128.0) as u16);
        self.write_word(Register::FinalRangeConfigMinCountRateRtnLimit, limit.to_bits())
    }

    pub fn signal_rate_limit(&mut self) -> Result<U9F7, Error<E>> {
        let bits = self.read_word(Register::FinalRangeConfigMinCountRateRtnLimit)?;
        Ok(U9F7::from_bits(bits))
    }
}
