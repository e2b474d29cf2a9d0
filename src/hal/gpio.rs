//! Reset Line
//!
//! The tuner's active-low reset input.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};

/// Reset line level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetLevel {
    /// Chip held in reset
    Asserted,
    /// Chip running
    Released,
}

/// Reset line driver
pub struct ResetLine<P> {
    pin: P,
    level: Option<ResetLevel>,
}

impl<P: OutputPin> ResetLine<P> {
    /// Wrap a push-pull output; the level is unknown until first driven
    #[must_use]
    pub const fn new(pin: P) -> Self {
        Self { pin, level: None }
    }

    /// Drive the line low, holding the chip in reset
    pub fn assert(&mut self) -> Result<()> {
        self.pin.set_low().map_err(|_| Error::ResetLineFailed)?;
        self.level = Some(ResetLevel::Asserted);
        Ok(())
    }

    /// Drive the line high, letting the chip run
    pub fn release(&mut self) -> Result<()> {
        self.pin.set_high().map_err(|_| Error::ResetLineFailed)?;
        self.level = Some(ResetLevel::Released);
        Ok(())
    }

    /// Give back the pin
    pub fn into_inner(self) -> P {
        self.pin
    }

    /// Last level driven
    #[must_use]
    pub const fn level(&self) -> Option<ResetLevel> {
        self.level
    }
}
