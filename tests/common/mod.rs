#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::blocking::i2c::{Write, WriteIter, WriteIterRead, WriteRead};

pub const STOP_VARIABLE: u8 = 0x3C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    Nack,
    Injected,
}

/// One register access as seen on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub page: usize,
    pub register: u8,
    pub bytes: Vec<u8>,
}

pub struct Registers {
    pub pages: [[u8; 256]; 2],
    page: usize,
    pub writes: Vec<Access>,
    pub reads: Vec<Access>,
    pub result: [u8; 12],
    /// Interrupt status polls answered with 0 after each interrupt clear.
    pub interrupt_after: usize,
    interrupt_polls: usize,
    /// Keep bit 0 of the range start register set forever.
    pub range_start_sticky: bool,
    pub fail_write: Option<(usize, u8)>,
    pub fail_all: bool,
}

/// Register level stand-in for a VL53L0X, shared between the driver and the test.
#[derive(Clone)]
pub struct FakeSensor {
    pub address: u8,
    state: Rc<RefCell<Registers>>,
}

impl FakeSensor {
    pub fn new() -> Self {
        let mut pages = [[0u8; 256]; 2];
        pages[0][0xC0] = 0xEE;
        pages[0][0x84] = 0x11;
        pages[1][0x91] = STOP_VARIABLE;

        FakeSensor {
            address: 0x29,
            state: Rc::new(RefCell::new(Registers {
                pages,
                page: 0,
                writes: Vec::new(),
                reads: Vec::new(),
                result: [0u8; 12],
                interrupt_after: 3,
                interrupt_polls: 0,
                range_start_sticky: false,
                fail_write: None,
                fail_all: false,
            })),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Registers) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    pub fn reg(&self, page: usize, register: u8) -> u8 {
        self.with(|r| r.pages[page][register as usize])
    }

    pub fn word(&self, page: usize, register: u8) -> u16 {
        u16::from_be_bytes([self.reg(page, register), self.reg(page, register + 1)])
    }

    pub fn dword(&self, page: usize, register: u8) -> u32 {
        u32::from_be_bytes([
            self.reg(page, register),
            self.reg(page, register + 1),
            self.reg(page, register + 2),
            self.reg(page, register + 3),
        ])
    }

    pub fn clear_log(&self) {
        self.with(|r| {
            r.writes.clear();
            r.reads.clear();
        });
    }

    pub fn writes(&self) -> Vec<Access> {
        self.with(|r| r.writes.clone())
    }

    pub fn reads_of(&self, page: usize, register: u8) -> usize {
        self.with(|r| {
            r.reads
                .iter()
                .filter(|a| a.page == page && a.register == register)
                .count()
        })
    }

    pub fn writes_to(&self, page: usize, register: u8) -> Vec<Vec<u8>> {
        self.with(|r| {
            r.writes
                .iter()
                .filter(|a| a.page == page && a.register == register)
                .map(|a| a.bytes.clone())
                .collect()
        })
    }
}

impl Write for FakeSensor {
    type Error = FakeError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), FakeError> {
        if address != self.address {
            return Err(FakeError::Nack);
        }
        let (&register, data) = bytes.split_first().ok_or(FakeError::Nack)?;

        self.with(|r| {
            if r.fail_all || r.fail_write == Some((r.page, register)) {
                return Err(FakeError::Injected);
            }

            r.writes.push(Access {
                page: r.page,
                register,
                bytes: data.to_vec(),
            });

            if register == 0xFF {
                r.page = (data[0] & 0x01) as usize;
                return Ok(());
            }

            let page = r.page;
            for (offset, byte) in data.iter().enumerate() {
                r.pages[page][register as usize + offset] = *byte;
            }

            if page == 0 && register == 0x0B {
                r.interrupt_polls = 0;
            }
            Ok(())
        })
    }
}

impl WriteRead for FakeSensor {
    type Error = FakeError;

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), FakeError> {
        if address != self.address || bytes.len() != 1 {
            return Err(FakeError::Nack);
        }
        let register = bytes[0];

        self.with(|r| {
            if r.fail_all {
                return Err(FakeError::Injected);
            }

            let page = r.page;
            r.reads.push(Access {
                page,
                register,
                bytes: Vec::new(),
            });

            match (page, register) {
                (0, 0x13) => {
                    r.interrupt_polls += 1;
                    buffer[0] = if r.interrupt_polls > r.interrupt_after { 0x01 } else { 0x00 };
                }
                (0, 0x14) if buffer.len() == 12 => buffer.copy_from_slice(&r.result),
                (0, 0x00) if !r.range_start_sticky => buffer[0] = r.pages[0][0] & !0x01,
                _ => {
                    for (offset, byte) in buffer.iter_mut().enumerate() {
                        *byte = r.pages[page][register as usize + offset];
                    }
                }
            }
            Ok(())
        })
    }
}

impl WriteIter for FakeSensor {
    type Error = FakeError;

    fn write<B>(&mut self, address: u8, bytes: B) -> Result<(), FakeError>
    where
        B: IntoIterator<Item = u8>,
    {
        let bytes: Vec<u8> = bytes.into_iter().collect();
        Write::write(self, address, &bytes)
    }
}

impl WriteIterRead for FakeSensor {
    type Error = FakeError;

    fn write_iter_read<B>(
        &mut self,
        address: u8,
        bytes: B,
        buffer: &mut [u8],
    ) -> Result<(), FakeError>
    where
        B: IntoIterator<Item = u8>,
    {
        let bytes: Vec<u8> = bytes.into_iter().collect();
        self.write_read(address, &bytes, buffer)
    }
}
