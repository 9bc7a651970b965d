use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;
use linux_embedded_hal::{i2cdev::linux::LinuxI2CError, Delay, I2cdev};
use vl53l0x_tof::{
    self,
    comm::{Read, Write},
    IOVoltage, Profile, VL53L0X,
};

fn measure_continuous<I2C, E, D>(
    mut tof: VL53L0X<I2C, D>,
    mut pace: impl DelayMs<u32>,
) -> Result<(), vl53l0x_tof::Error<E>>
where
    E: Debug,
    I2C: Read<Error = E> + Write<Error = E>,
    D: DelayMs<u32>,
{
    // Initialize the device, this also starts continuous ranging.
    if let Err(e) = tof.try_initialize(IOVoltage::Volt2_8, Profile::Default) {
        println!("{}", e);
        return Err(e.error);
    }

    let period = tof.profile().inter_measurement_period_ms();

    loop {
        // Fetch the result if the sensor has one.
        if let Some(measurement) = tof.update()? {
            if measurement.is_valid() {
                println!("{} mm", measurement.range_mm());
            } else {
                println!("{:?}", measurement.range_status());
            }
        }

        // Poll at the pace of the sensor.
        pace.delay_ms(period);
    }
}

fn main() -> Result<(), vl53l0x_tof::Error<LinuxI2CError>> {
    let i2c = I2cdev::new("/dev/i2c-1")?;

    let tof = VL53L0X::new(i2c, Delay, vl53l0x_tof::DEFAULT_ADDRESS);

    measure_continuous(tof, Delay)?;

    Ok(())
}
