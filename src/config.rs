//! Fixed tables driving the VL53L0X bring-up and timing configuration.
//!
//! The values mirror the sensor's undocumented internal encodings. They are
//! applied verbatim and must not be reordered, merged or "simplified".

use crate::measurement::RangeStatus;

/// Register/value script loading the default tuning settings.
///
/// Writes to `0xFF` select the register page for every following entry.
pub const DEFAULT_CONFIGURATION: [(u8, u8); 80] = [
    (0xFF, 0x01), (0x00, 0x00), (0xFF, 0x00), (0x09, 0x00),
    (0x10, 0x00), (0x11, 0x00), (0x24, 0x01), (0x25, 0xFF),
    (0x75, 0x00), (0xFF, 0x01), (0x4E, 0x2C), (0x48, 0x00),
    (0x30, 0x20), (0xFF, 0x00), (0x30, 0x09), (0x54, 0x00),
    (0x31, 0x04), (0x32, 0x03), (0x40, 0x83), (0x46, 0x25),
    (0x60, 0x00), (0x27, 0x00), (0x50, 0x06), (0x51, 0x00),
    (0x52, 0x96), (0x56, 0x08), (0x57, 0x30), (0x61, 0x00),
    (0x62, 0x00), (0x64, 0x00), (0x65, 0x00), (0x66, 0xA0),
    (0xFF, 0x01), (0x22, 0x32), (0x47, 0x14), (0x49, 0xFF),
    (0x4A, 0x00), (0xFF, 0x00), (0x7A, 0x0A), (0x7B, 0x00),
    (0x78, 0x21), (0xFF, 0x01), (0x23, 0x34), (0x42, 0x00),
    (0x44, 0xFF), (0x45, 0x26), (0x46, 0x05), (0x40, 0x40),
    (0x0E, 0x06), (0x20, 0x1A), (0x43, 0x40), (0xFF, 0x00),
    (0x34, 0x03), (0x35, 0x44), (0xFF, 0x01), (0x31, 0x04),
    (0x4B, 0x09), (0x4C, 0x05), (0x4D, 0x04), (0xFF, 0x00),
    (0x44, 0x00), (0x45, 0x20), (0x47, 0x08), (0x48, 0x28),
    (0x67, 0x00), (0x70, 0x04), (0x71, 0x01), (0x72, 0xFE),
    (0x76, 0x00), (0x77, 0x00), (0xFF, 0x01), (0x0D, 0x01),
    (0xFF, 0x00), (0x80, 0x01), (0x01, 0xF8), (0xFF, 0x01),
    (0x8E, 0x01), (0x00, 0x01), (0xFF, 0x00), (0x80, 0x00),
];

pub const PRE_RANGE_PERIOD_MIN: u8 = 12;
pub const PRE_RANGE_PERIOD_MAX: u8 = 18;
pub const FINAL_RANGE_PERIOD_MIN: u8 = 8;
pub const FINAL_RANGE_PERIOD_MAX: u8 = 14;

/// Pre-range valid phase high, indexed by [`pre_range_index`].
pub const PRE_RANGE_PHASE_HIGH: [u8; 4] = [0x18, 0x30, 0x40, 0x50];
/// Pre-range timeout in encoded macro periods, indexed by [`pre_range_index`].
pub const PRE_RANGE_TIMEOUT_MACROP: [u16; 4] = [0x00AF, 0x0096, 0x0083, 0x0073];
/// MSRC timeout, indexed by [`pre_range_index`].
pub const PRE_RANGE_MSRC_TIMEOUT: [u8; 4] = [0x2B, 0x25, 0x20, 0x1C];

/// Pre-range valid phase low, identical for every period.
pub const PRE_RANGE_PHASE_LOW: u8 = 0x08;

/// Final range settings indexed by [`final_range_index`]:
/// valid phase high, valid phase low, VCSEL width, phase-cal timeout, phase-cal limit.
pub const FINAL_RANGE_VALUES: [[u8; 5]; 4] = [
    [0x10, 0x08, 0x02, 0x0C, 0x30],
    [0x28, 0x08, 0x03, 0x09, 0x20],
    [0x38, 0x08, 0x03, 0x08, 0x20],
    [0x48, 0x08, 0x03, 0x07, 0x20],
];

/// Final range timeout for a pre/final period pair, indexed `[pre][final]`.
pub const PRE_AND_FINAL_TIMEOUT_MACROP: [[u16; 4]; 4] = [
    [0x02B0, 0x0296, 0x0284, 0x01EF],
    [0x02AA, 0x028F, 0x01FE, 0x01E3],
    [0x02A6, 0x028B, 0x01F2, 0x01D9],
    [0x02A3, 0x0288, 0x01EC, 0x01D3],
];

/// Inter-measurement period (ms) in profile order: default, high accuracy, long range, high speed.
pub const INTER_MEASUREMENT_PERIOD_MS: [u32; 4] = [30, 200, 33, 20];

/// Minimum return signal rate (MCPS) in profile order.
pub const SIGNAL_RATE_LIMIT_MCPS: [f32; 4] = [0.25, 0.25, 0.10, 0.25];

/// (pre-range, final range) VCSEL periods in profile order.
pub const VCSEL_PERIODS: [(u8, u8); 4] = [(14, 10), (14, 10), (18, 14), (14, 10)];

/// Final range timeout override in profile order.
pub const FINAL_RANGE_TIMEOUT_OVERRIDE: [Option<u16>; 4] = [None, Some(0x059A), None, Some(0x00D5)];

/// Device range status code (4 bits) to [`RangeStatus`].
pub const RANGE_STATUS_TABLE: [RangeStatus; 16] = [
    RangeStatus::Unknown, RangeStatus::HardwareFailure,
    RangeStatus::HardwareFailure, RangeStatus::HardwareFailure,
    RangeStatus::SignalFailure, RangeStatus::PhaseFailure,
    RangeStatus::MinRangeFailure, RangeStatus::Unknown,
    RangeStatus::MinRangeFailure, RangeStatus::PhaseFailure,
    RangeStatus::MinRangeFailure, RangeStatus::Ok,
    RangeStatus::Unknown, RangeStatus::Unknown,
    RangeStatus::Unknown, RangeStatus::Unknown,
];

fn period_index(period: u8, min: u8, max: u8) -> Option<usize> {
    if period & 1 != 0 || !(min..=max).contains(&period) {
        return None;
    }
    Some(((period - min) >> 1) as usize)
}

/// Table index for a pre-range VCSEL period, `None` unless the period is even and in `12..=18`.
pub fn pre_range_index(period: u8) -> Option<usize> {
    period_index(period, PRE_RANGE_PERIOD_MIN, PRE_RANGE_PERIOD_MAX)
}

/// Table index for a final range VCSEL period, `None` unless the period is even and in `8..=14`.
pub fn final_range_index(period: u8) -> Option<usize> {
    period_index(period, FINAL_RANGE_PERIOD_MIN, FINAL_RANGE_PERIOD_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_ends_on_page_zero() {
        let last_page_select = DEFAULT_CONFIGURATION
            .iter()
            .rev()
            .find(|(reg, _)| *reg == 0xFF)
            .map(|(_, page)| *page);
        assert_eq!(last_page_select, Some(0x00));
        assert_eq!(DEFAULT_CONFIGURATION[0], (0xFF, 0x01));
        assert_eq!(DEFAULT_CONFIGURATION[79], (0x80, 0x00));
    }

    #[test]
    fn pre_range_index_accepts_even_periods_in_range() {
        assert_eq!(pre_range_index(12), Some(0));
        assert_eq!(pre_range_index(14), Some(1));
        assert_eq!(pre_range_index(16), Some(2));
        assert_eq!(pre_range_index(18), Some(3));
    }

    #[test]
    fn pre_range_index_rejects_illegal_periods() {
        for period in [0, 10, 11, 13, 15, 17, 19, 20, 255] {
            assert_eq!(pre_range_index(period), None, "period {}", period);
        }
    }

    #[test]
    fn final_range_index_covers_legal_range() {
        assert_eq!(final_range_index(8), Some(0));
        assert_eq!(final_range_index(14), Some(3));
        for period in [6, 7, 9, 13, 15, 16] {
            assert_eq!(final_range_index(period), None, "period {}", period);
        }
    }

    #[test]
    fn only_code_eleven_is_ok() {
        let ok_codes: usize = RANGE_STATUS_TABLE.iter().filter(|s| **s == RangeStatus::Ok).count();
        assert_eq!(ok_codes, 1);
        assert_eq!(RANGE_STATUS_TABLE[11], RangeStatus::Ok);
    }
}
