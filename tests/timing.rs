mod common;

use common::FakeSensor;
use embedded_hal_mock::delay::MockNoop;
use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use fixed::types::U9F7;
use vl53l0x_tof::config::{
    FINAL_RANGE_VALUES, PRE_AND_FINAL_TIMEOUT_MACROP, PRE_RANGE_MSRC_TIMEOUT, PRE_RANGE_PHASE_HIGH,
    PRE_RANGE_TIMEOUT_MACROP,
};
use vl53l0x_tof::{Error, VL53L0X, DEFAULT_ADDRESS};

#[test]
fn every_legal_pair_writes_table_values() {
    for pre in (12u8..=18).step_by(2) {
        for fin in (8u8..=14).step_by(2) {
            let fake = FakeSensor::new();
            fake.with(|r| r.pages[0][0x01] = 0xE8);
            let mut tof = VL53L0X::new(fake.clone(), MockNoop::new(), DEFAULT_ADDRESS);

            tof.set_vcsel_periods(pre, fin).unwrap();

            let p = ((pre - 12) >> 1) as usize;
            let f = ((fin - 8) >> 1) as usize;
            let [phase_high, phase_low, width, phasecal_timeout, phasecal_limit] =
                FINAL_RANGE_VALUES[f];

            assert_eq!(fake.reg(0, 0x57), PRE_RANGE_PHASE_HIGH[p]);
            assert_eq!(fake.reg(0, 0x56), 0x08);
            assert_eq!(fake.reg(0, 0x50), (pre >> 1) - 1);
            assert_eq!(fake.word(0, 0x51), PRE_RANGE_TIMEOUT_MACROP[p]);
            assert_eq!(fake.reg(0, 0x46), PRE_RANGE_MSRC_TIMEOUT[p]);

            assert_eq!(fake.reg(0, 0x48), phase_high);
            assert_eq!(fake.reg(0, 0x47), phase_low);
            assert_eq!(fake.reg(0, 0x32), width);
            assert_eq!(fake.reg(0, 0x30), phasecal_timeout);
            assert_eq!(fake.reg(1, 0x30), phasecal_limit);
            assert_eq!(fake.reg(0, 0x70), (fin >> 1) - 1);
            assert_eq!(fake.word(0, 0x71), PRE_AND_FINAL_TIMEOUT_MACROP[p][f]);

            // phase calibration ran and the sequence config was restored
            assert_eq!(fake.writes_to(0, 0x01), vec![vec![0x02], vec![0xE8]]);
            assert_eq!(fake.reg(0, 0x01), 0xE8);
        }
    }
}

#[test]
fn illegal_periods_write_nothing() {
    let pairs = [(10, 10), (13, 10), (20, 10), (14, 6), (14, 9), (14, 16), (0, 0), (255, 255)];
    let mut i2c = I2cMock::new(&[]);
    let mut tof = VL53L0X::new(i2c.clone(), MockNoop::new(), DEFAULT_ADDRESS);

    for (pre, fin) in pairs {
        assert!(matches!(
            tof.set_vcsel_periods(pre, fin),
            Err(Error::InvalidVcselPeriod(_))
        ));
    }

    i2c.done();
}

#[test]
fn illegal_period_is_reported() {
    let mut i2c = I2cMock::new(&[]);
    let mut tof = VL53L0X::new(i2c.clone(), MockNoop::new(), DEFAULT_ADDRESS);

    assert!(matches!(tof.set_vcsel_periods(15, 10), Err(Error::InvalidVcselPeriod(15))));
    assert!(matches!(tof.set_vcsel_periods(14, 16), Err(Error::InvalidVcselPeriod(16))));

    i2c.done();
}

#[test]
fn failure_leaves_sequence_config_alone() {
    let fake = FakeSensor::new();
    fake.with(|r| {
        r.pages[0][0x01] = 0xE8;
        r.interrupt_after = usize::MAX;
    });
    let mut tof = VL53L0X::new(fake.clone(), MockNoop::new(), DEFAULT_ADDRESS);

    assert!(matches!(tof.set_vcsel_periods(14, 10), Err(Error::Timeout)));
    assert_eq!(fake.reg(0, 0x01), 0x02);
}

#[test]
fn signal_rate_limit_is_floored() {
    let cases: [(f32, u16); 5] = [(0.0, 0), (0.1, 12), (0.25, 32), (1.999, 255), (511.99, 65534)];

    for (mcps, bits) in cases {
        let [hi, lo] = bits.to_be_bytes();
        let mut i2c = I2cMock::new(&[I2cTransaction::write(DEFAULT_ADDRESS, vec![0x44, hi, lo])]);
        let mut tof = VL53L0X::new(i2c.clone(), MockNoop::new(), DEFAULT_ADDRESS);

        tof.set_signal_rate_limit(mcps).unwrap();

        i2c.done();
    }
}

#[test]
fn signal_rate_limit_out_of_range() {
    let mut i2c = I2cMock::new(&[]);
    let mut tof = VL53L0X::new(i2c.clone(), MockNoop::new(), DEFAULT_ADDRESS);

    for mcps in [-0.01, -1.0, 512.0, 1000.0, f32::NAN] {
        assert!(matches!(
            tof.set_signal_rate_limit(mcps),
            Err(Error::InvalidSignalRateLimit)
        ));
    }

    i2c.done();
}

#[test]
fn signal_rate_limit_read_back() {
    let mut i2c = I2cMock::new(&[I2cTransaction::write_read(
        DEFAULT_ADDRESS,
        vec![0x44],
        vec![0x00, 0x20],
    )]);
    let mut tof = VL53L0X::new(i2c.clone(), MockNoop::new(), DEFAULT_ADDRESS);

    assert_eq!(tof.signal_rate_limit().unwrap(), U9F7::from_num(0.25));

    i2c.done();
}
