//! I2C Transport Adapter
//!
//! Wraps an async `embedded-hal` I2C bus behind frame-level operations.
//! Each call is one bus transaction at the tuner's fixed address; every
//! transaction is logged in hex at trace level.

use embedded_hal::i2c::Error as _;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use crate::config::{ELITE_I2C_ADDR, ELITE_I2C_ADDR_ALT, MAX_READ_LEN};
use crate::error::{Error, Result};
use crate::fmt::Hex;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Elite tuner default address
    pub const ELITE: Self = Self(ELITE_I2C_ADDR);

    /// Elite tuner alternate address
    pub const ELITE_ALT: Self = Self(ELITE_I2C_ADDR_ALT);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Frame-level bus access to one device
pub struct FrameBus<I2C> {
    i2c: I2C,
    addr: I2cAddress,
}

impl<I2C: I2c> FrameBus<I2C> {
    /// Create a new frame bus for the device at `addr`
    #[must_use]
    pub const fn new(i2c: I2C, addr: I2cAddress) -> Self {
        Self { i2c, addr }
    }

    /// Device address
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.addr
    }

    /// Write one frame, returning the number of bytes written
    pub async fn write_frame(&mut self, frame: &[u8]) -> Result<usize> {
        trace!("i2c write: {}", Hex(frame));
        self.i2c
            .write(self.addr.addr(), frame)
            .await
            .map_err(|e| Error::BusTransferFailed(e.kind()))?;
        Ok(frame.len())
    }

    /// Read `count` bytes in one transaction
    pub async fn read_frame(&mut self, count: usize) -> Result<Vec<u8, MAX_READ_LEN>> {
        let mut buf = Vec::new();
        buf.resize_default(count)
            .map_err(|()| Error::FrameOverflow { len: count })?;
        self.i2c
            .read(self.addr.addr(), &mut buf)
            .await
            .map_err(|e| Error::BusTransferFailed(e.kind()))?;
        trace!("i2c read: {}", Hex(&buf));
        Ok(buf)
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}
