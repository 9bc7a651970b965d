use crate::config::RANGE_STATUS_TABLE;

/// Length of the result block starting at [`crate::register::Register::ResultRangeStatus`].
pub const RESULT_BUFFER_LEN: usize = 12;

/// Distance reported when a measurement is not valid.
pub const INVALID_RANGE: i32 = -1;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeStatus {
    HardwareFailure = 1,
    SignalFailure = 4,
    PhaseFailure = 5,
    MinRangeFailure = 6,
    Ok = 11,
    Unknown = 255,
}

impl RangeStatus {
    /// Map a 4-bit device status code, higher bits are ignored.
    pub fn from_code(code: u8) -> Self {
        RANGE_STATUS_TABLE[(code & 0x0F) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    status_code: u8,
    status: RangeStatus,
    raw_range: u16,
}

impl Measurement {
    pub fn from_result_buffer(buffer: &[u8; RESULT_BUFFER_LEN]) -> Self {
        let status_code = (buffer[0] & 0x78) >> 3;

        Measurement {
            status_code,
            status: RangeStatus::from_code(status_code),
            raw_range: u16::from_be_bytes([buffer[10], buffer[11]]),
        }
    }

    pub fn status_code(&self) -> u8 {
        self.status_code
    }

    pub fn range_status(&self) -> RangeStatus {
        self.status
    }

    pub fn is_valid(&self) -> bool {
        self.status == RangeStatus::Ok
    }

    /// Distance as read from the device, whatever the status.
    pub fn raw_range_mm(&self) -> u16 {
        self.raw_range
    }

    /// Distance in millimeters or [`INVALID_RANGE`].
    pub fn range_mm(&self) -> i32 {
        if self.is_valid() {
            i32::from(self.raw_range)
        } else {
            INVALID_RANGE
        }
    }
}
