//! Elite Tuner Driver
//!
//! Drives the Elite radio tuner over I2C. After reset the chip runs a ROM
//! loader that accepts the boot image through Mode3 writes; once booted it
//! answers command frames written to `01 90 00` with responses read from
//! `01 90 EB`. State-changing commands start an internal sequence that is
//! awaited by polling the tuner driver status register.
//!
//! The protocol is strictly half-duplex: every method awaits the previous
//! bus transaction before issuing the next, and `&mut self` keeps a single
//! exchange in flight.

mod boot;
mod coefficients;
mod command;
mod readiness;
mod tuner;

pub use coefficients::MemoryRegion;
pub use command::command_payload;
pub use readiness::{PollState, ReadinessPoller};

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{
    EliteConfig, LIVENESS_ADDRESS, LIVENESS_SIGNATURE, LONG_TURNAROUND_US, MAX_READ_LEN,
    SHORT_TURNAROUND_US,
};
use crate::error::{Error, Result};
use crate::hal::gpio::ResetLine;
use crate::hal::i2c::{FrameBus, I2cAddress};
use crate::hal::timer::Clock;
use crate::protocol::{self, AddressTriplet, FrameMode, Units};
use crate::tables::ChipTables;
use crate::types::DriverState;

/// Elite tuner driver
pub struct Elite<'t, I2C, RST, D, C> {
    bus: FrameBus<I2C>,
    reset: ResetLine<RST>,
    delay: D,
    clock: C,
    config: EliteConfig,
    tables: ChipTables<'t>,
    state: DriverState,
}

impl<I2C, RST, D, C> Elite<'static, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Create a driver using the tables embedded at build time
    #[must_use]
    pub fn new(i2c: I2C, reset: RST, delay: D, clock: C, config: EliteConfig) -> Self {
        Elite::with_tables(i2c, reset, delay, clock, config, ChipTables::BUILTIN)
    }
}

impl<'t, I2C, RST, D, C> Elite<'t, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Create a driver with explicit chip tables
    #[must_use]
    pub fn with_tables(
        i2c: I2C,
        reset: RST,
        delay: D,
        clock: C,
        config: EliteConfig,
        tables: ChipTables<'t>,
    ) -> Self {
        Self {
            bus: FrameBus::new(i2c, I2cAddress::new(config.i2c_address)),
            reset: ResetLine::new(reset),
            delay,
            clock,
            config,
            tables,
            state: DriverState::default(),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &EliteConfig {
        &self.config
    }

    /// Status flags from the most recent status read
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Release the bus and reset pin
    pub fn release(self) -> (I2C, RST) {
        (self.bus.release(), self.reset.into_inner())
    }

    /// Reset the chip, download the boot image and check it is alive
    ///
    /// The reset line is held low for `reset_hold_ms`, the boot image is
    /// streamed, and after `boot_settle_ms` a Mode1 read of the liveness
    /// address must return [`LIVENESS_SIGNATURE`].
    pub async fn init(&mut self) -> Result<()> {
        self.reset.assert()?;
        self.delay.delay_ms(self.config.reset_hold_ms).await;
        self.reset.release()?;

        self.download_boot_image().await?;
        self.delay.delay_ms(self.config.boot_settle_ms).await;

        let out = self.direct_read(LIVENESS_ADDRESS, 1, FrameMode::Mode1).await?;
        let mut status = [0u8; 4];
        status.copy_from_slice(&out[..4]);
        if status != LIVENESS_SIGNATURE {
            warn!("liveness probe failed: {}", crate::fmt::Hex(&status));
            return Err(Error::InitializationFailed(status));
        }

        info!("elite tuner up");
        Ok(())
    }

    /// Write `unit_count` units of `data` to `address` in `mode`
    ///
    /// Returns the number of bytes put on the bus.
    pub async fn direct_write(
        &mut self,
        address: AddressTriplet,
        data: &[u8],
        unit_count: usize,
        mode: FrameMode,
        append_checksum: bool,
    ) -> Result<usize> {
        let frame = protocol::encode_write(mode, address, data, unit_count, append_checksum)?;
        self.bus.write_frame(&frame).await
    }

    /// Read from `address` in `mode`
    ///
    /// `unit_count` only matters for Mode3; Mode4 responses size
    /// themselves (see [`protocol::decode_read`]).
    pub async fn direct_read(
        &mut self,
        address: AddressTriplet,
        unit_count: usize,
        mode: FrameMode,
    ) -> Result<Units> {
        let len = protocol::read_len(mode, unit_count)?;
        if len > MAX_READ_LEN {
            return Err(Error::FrameOverflow { len });
        }

        let header = protocol::encode_read(mode, address);
        self.bus.write_frame(&header).await?;

        let turnaround = match mode {
            FrameMode::Mode1 | FrameMode::Mode4 => SHORT_TURNAROUND_US,
            FrameMode::Mode2 | FrameMode::Mode3 => LONG_TURNAROUND_US,
        };
        self.delay.delay_us(turnaround).await;

        let raw = self.bus.read_frame(len).await?;
        protocol::decode_read(mode, &raw)
    }
}
