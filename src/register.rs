//! Register map of the VL53L0X.
//!
//! Only registers with a known meaning are named here. The default
//! configuration script in [`crate::config`] writes many undocumented
//! registers by raw index.

/// Named registers of the VL53L0X (page 0 unless noted otherwise).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Range start / mode trigger (0x00)
    SysRangeStart = 0x00,
    /// Enabled ranging sequence steps (0x01)
    SystemSequenceConfig = 0x01,
    /// Inter-measurement period in milliseconds, 32 bits (0x04)
    SystemIntermeasurementPeriod = 0x04,
    /// GPIO interrupt source selection (0x0A)
    SystemInterruptConfigGpio = 0x0A,
    /// Interrupt clear (0x0B)
    SystemInterruptClear = 0x0B,
    /// Interrupt status, low three bits (0x13)
    ResultInterruptStatus = 0x13,
    /// First byte of the 12 byte range result block (0x14)
    ResultRangeStatus = 0x14,
    /// Phase calibration timeout, also the phase calibration limit on page 1 (0x30)
    AlgoPhasecalConfigTimeout = 0x30,
    /// Global VCSEL width (0x32)
    GlobalConfigVcselWidth = 0x32,
    /// Final range minimum return signal rate, 9.7 fixed point MCPS (0x44)
    FinalRangeConfigMinCountRateRtnLimit = 0x44,
    /// MSRC timeout in macro periods (0x46)
    MsrcConfigTimeoutMacrop = 0x46,
    /// Final range valid phase low (0x47)
    FinalRangeConfigValidPhaseLow = 0x47,
    /// Final range valid phase high (0x48)
    FinalRangeConfigValidPhaseHigh = 0x48,
    /// Pre-range VCSEL period, encoded (0x50)
    PreRangeConfigVcselPeriod = 0x50,
    /// Pre-range timeout, 16 bits (0x51)
    PreRangeConfigTimeoutMacropHi = 0x51,
    /// Pre-range valid phase low (0x56)
    PreRangeConfigValidPhaseLow = 0x56,
    /// Pre-range valid phase high (0x57)
    PreRangeConfigValidPhaseHigh = 0x57,
    /// MSRC control (0x60)
    MsrcConfigControl = 0x60,
    /// Final range VCSEL period, encoded (0x70)
    FinalRangeConfigVcselPeriod = 0x70,
    /// Final range timeout, 16 bits (0x71)
    FinalRangeConfigTimeoutMacropHi = 0x71,
    /// GPIO interrupt polarity (0x84)
    GpioHvMuxActiveHigh = 0x84,
    /// Pad voltage select (0x89)
    VhvConfigPadSclSdaExtsupHv = 0x89,
    /// I2C slave device address (0x8A)
    I2cSlaveDeviceAddress = 0x8A,
    /// Stop variable, valid while page 1 is selected (0x91)
    StopVariable = 0x91,
    /// Soft reset, active low (0xBF)
    SoftResetGo2SoftResetN = 0xBF,
    /// Model identification (0xC0)
    IdentificationModelId = 0xC0,
    /// Register page select (0xFF)
    PageSelect = 0xFF,
}

impl From<Register> for u8 {
    fn from(r: Register) -> Self {
        r as u8
    }
}

/// Expected content of [`Register::IdentificationModelId`].
pub const MODEL_ID: u8 = 0xEE;

pub const SEQUENCE_STEP_DSS: u8 = 0x28;
pub const SEQUENCE_STEP_PRE_RANGE: u8 = 0x40;
pub const SEQUENCE_STEP_FINAL_RANGE: u8 = 0x80;

/// Sequence steps used for ranging.
pub const SEQUENCE_STEPS: u8 =
    SEQUENCE_STEP_DSS | SEQUENCE_STEP_PRE_RANGE | SEQUENCE_STEP_FINAL_RANGE;

pub const INTERRUPT_STATUS_MASK: u8 = 0x07;

pub const RANGE_START_SINGLE: u8 = 0x01;
pub const RANGE_START_BACK_TO_BACK: u8 = 0x02;

/// Disables the MSRC and pre-range minimum signal rate checks.
pub const MSRC_CONFIG_CONTROL_LIMIT_CHECKS: u8 = 0x12;

/// Interrupt on new sample ready.
pub const GPIO_INTERRUPT_NEW_SAMPLE_READY: u8 = 0x04;
pub const GPIO_HV_MUX_POLARITY: u8 = 0x10;

pub const PAGE_0: u8 = 0x00;
pub const PAGE_1: u8 = 0x01;
