use core::fmt::Debug;
use embedded_hal::blocking::delay::DelayMs;
use linux_embedded_hal::{i2cdev::linux::LinuxI2CError, Delay, I2cdev};
use vl53l0x_tof::{
    self,
    comm::{Read, Write},
    IOVoltage, Profile, VL53L0X,
};

fn measure_continuous<I2C, E, D>(mut tof: VL53L0X<I2C, D>) -> Result<(), vl53l0x_tof::Error<E>>
where
    E: Debug,
    I2C: Read<Error = E> + Write<Error = E>,
    D: DelayMs<u32>,
{
    tof.initialize(IOVoltage::Volt2_8, Profile::HighSpeed);
    if !tof.is_initialized() {
        return Err(vl53l0x_tof::Error::NotReady);
    }

    loop {
        if let Some(measurement) = tof.update()? {
            if measurement.is_valid() {
                println!("0x{:02x}: {} mm", tof.address(), measurement.range_mm());
            }
        }
    }
}

fn main() -> Result<(), vl53l0x_tof::Error<LinuxI2CError>> {
    let i2c = I2cdev::new("/dev/i2c-1")?;

    let bus = shared_bus::new_std!(I2cdev = i2c).expect("Failed to create bus manager");

    let vl1 = VL53L0X::new(bus.acquire_i2c(), Delay, vl53l0x_tof::DEFAULT_ADDRESS);

    // The second sensor must already answer on 0x30, moved there with
    // `set_address` while the first one was held in reset.
    let vl2 = VL53L0X::new(bus.acquire_i2c(), Delay, 0x30);

    std::thread::spawn(move || measure_continuous(vl1));

    measure_continuous(vl2)?;

    Ok(())
}
