use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;
use linux_embedded_hal::{i2cdev::linux::LinuxI2CError, Delay, I2cdev};
use vl53l0x_tof::{
    self,
    comm::{Read, Write},
    IOVoltage, Profile, VL53L0X, INVALID_RANGE,
};

fn measure_long_distance<I2C, E, D>(mut tof: VL53L0X<I2C, D>) -> Result<(), vl53l0x_tof::Error<E>>
where
    E: Debug,
    I2C: Read<Error = E> + Write<Error = E>,
    D: DelayMs<u32>,
{
    // Ensure the correct device is connected
    if !tof.is_connected() {
        println!("No VL53L0X found");
        return Ok(());
    }

    // Long range profile trades accuracy for reach.
    tof.initialize(IOVoltage::Volt2_8, Profile::LongRange);
    if !tof.is_initialized() {
        println!("Initialization failed");
        return Ok(());
    }

    // Single shots only from here on.
    tof.stop_continuous()?;

    for _ in 0..10 {
        match tof.measure_single(vl53l0x_tof::DEFAULT_SINGLE_SHOT_TIMEOUT_MS) {
            INVALID_RANGE => println!("invalid ({:?})", tof.range_status()),
            mm => println!("{} cm ({} mm)", tof.distance_cm(), mm),
        }
    }

    // Leave the sensor in a known state.
    tof.reset()?;

    Ok(())
}

fn main() -> Result<(), vl53l0x_tof::Error<LinuxI2CError>> {
    let i2c = I2cdev::new("/dev/i2c-1")?;

    let tof = VL53L0X::new(i2c, Delay, vl53l0x_tof::DEFAULT_ADDRESS);

    measure_long_distance(tof)?;

    Ok(())
}
