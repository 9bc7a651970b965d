//! Traits and implementations needed for I2C communication.
use cfg_if::cfg_if;
use core::fmt::Debug;

/// Trait to write registers of the VL53L0X.
pub trait Write {
    /// Error return type.
    type Error: Debug;
    /// Write registers with the given bytes.
    /// (Number of bytes is limited to 4 for non iterator implementations)
    ///
    /// Multi-byte values are expected in big-endian order, the sensor
    /// auto increments the register index for every byte after the first.
    ///
    /// # Arguments
    ///
    /// * `address` - The 7-bit i2c address.
    /// * `register` - The register to write to.
    /// * `bytes` - The bytes to be written at the given register.
    fn write_registers(
        &mut self,
        address: u8,
        register: u8,
        bytes: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Trait to read registers of the VL53L0X.
pub trait Read {
    /// Error return type.
    type Error: Debug;
    /// Read registers into the given bytes.
    ///
    /// The call either fills `bytes` completely or fails.
    ///
    /// * `address` - The 7-bit i2c address.
    /// * `register` - The register to read from (Auto increments if more than 1 byte is read).
    /// * `bytes` - The slice into which the read data will be put.
    fn read_registers(
        &mut self,
        address: u8,
        register: u8,
        bytes: &mut [u8],
    ) -> Result<(), Self::Error>;
}

cfg_if! {
    if #[cfg(feature = "i2c-iter")] {
        use embedded_hal::blocking::i2c::{WriteIter, WriteIterRead};
        impl<I2C> Write for I2C
        where I2C : WriteIter,
            <I2C as WriteIter>::Error : Debug
        {
            type Error = <I2C as WriteIter>::Error;
            fn write_registers(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
                let iter = core::iter::once(register).chain(bytes.iter().copied());
                self.write(address, iter)
            }
        }

        impl<I2C> Read for I2C
        where I2C : WriteIterRead,
            <I2C as WriteIterRead>::Error : Debug
        {
            type Error = <I2C as WriteIterRead>::Error;
            fn read_registers(&mut self, address: u8, register: u8, bytes: &mut [u8]) -> Result<(), Self::Error> {
                self.write_iter_read(address, core::iter::once(register), bytes)
            }
        }
    } else {
        use embedded_hal::blocking::i2c::{Write as I2CWrite, WriteRead};
        impl<I2C> Write for I2C
        where I2C : I2CWrite,
            <I2C as I2CWrite>::Error : Debug
        {
            type Error = <I2C as I2CWrite>::Error;
            fn write_registers(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
                assert!(bytes.len() <= 4);

                let mut tmp = [0u8; 5];
                tmp[0] = register;
                tmp[1..=bytes.len()].copy_from_slice(bytes);

                self.write(address, &tmp[..bytes.len()+1])
            }
        }

        impl<I2C> Read for I2C
        where I2C : WriteRead,
            <I2C as WriteRead>::Error : Debug
        {
            type Error = <I2C as WriteRead>::Error;
            fn read_registers(&mut self, address: u8, register: u8, bytes: &mut [u8]) -> Result<(), Self::Error> {
                self.write_read(address, &[register], bytes)
            }
        }
    }
}
