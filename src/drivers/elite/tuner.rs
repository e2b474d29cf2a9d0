//! Tuner operations
//!
//! Parameter marshaling for startup, band/frequency changes, front-end
//! register overrides and signal-quality reads.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use super::Elite;
use crate::config::MAX_COMMAND_PARAMS;
use crate::error::{Error, Result};
use crate::hal::timer::Clock;
use crate::types::{AlignMode, Band, CommandCode, Frequency, TunerStatus};

/// Start index that selects the single-register override
const FE_SINGLE_OVERRIDE_START: usize = 15;

/// Table index sent by the single-register override
const FE_SINGLE_OVERRIDE_INDEX: usize = 10;

impl<I2C, RST, D, C> Elite<'_, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Start the tuner with VCO alignment
    ///
    /// Waits up to `startup_timeout_ms` for the chip to settle.
    pub async fn startup(&mut self, align: AlignMode) -> Result<()> {
        self.command_exchange(CommandCode::STARTUP, &[[0, 0, align.code()]], 1)
            .await?;
        self.wait_ready(self.config.startup_timeout_ms).await
    }

    /// Switch band, set its tuning limits and tune to `freq`
    pub async fn change_band(
        &mut self,
        band: Band,
        min: Frequency,
        max: Frequency,
        freq: Frequency,
    ) -> Result<()> {
        let params = [
            band.to_triplet(),
            min.to_triplet(),
            max.to_triplet(),
            freq.to_triplet(),
        ];
        self.command_exchange(CommandCode::CHANGE_BAND, &params, 1)
            .await?;
        info!("band {:?}: {} kHz", band, freq.as_khz());
        self.wait_ready(self.config.command_timeout_ms).await
    }

    /// Tune within the current band
    pub async fn change_frequency(&mut self, freq: Frequency) -> Result<()> {
        self.command_exchange(CommandCode::CHANGE_FREQ, &[freq.to_triplet()], 1)
            .await?;
        debug!("tuned to {} kHz", freq.as_khz());
        self.wait_ready(self.config.command_timeout_ms).await
    }

    /// Override front-end registers from the band's table
    ///
    /// Sends up to `count` registers starting at table index `start`.
    /// `count == 0` only probes the status register. `start == 15` always
    /// sends the single register at index 10, whatever `count` is.
    /// Returns the number of registers sent.
    pub async fn set_fe_registers(&mut self, band: Band, start: usize, count: usize) -> Result<usize> {
        if count == 0 {
            self.read_tds().await?;
            return Ok(0);
        }

        let table = self.tables.fe_table(band);
        let mut params: Vec<[u8; 3], MAX_COMMAND_PARAMS> = Vec::new();

        if start == FE_SINGLE_OVERRIDE_START {
            let reg = table
                .get(FE_SINGLE_OVERRIDE_INDEX)
                .ok_or(Error::RegisterIndexOutOfRange {
                    band,
                    index: FE_SINGLE_OVERRIDE_INDEX,
                })?;
            params
                .push(reg)
                .map_err(|_| Error::TooManyParameters(1))?;
        } else {
            if start >= table.len() {
                return Err(Error::RegisterIndexOutOfRange { band, index: start });
            }
            let end = start + count.min(table.len() - start).min(MAX_COMMAND_PARAMS);
            for index in start..end {
                let reg = table
                    .get(index)
                    .ok_or(Error::RegisterIndexOutOfRange { band, index })?;
                params
                    .push(reg)
                    .map_err(|_| Error::TooManyParameters(end - start))?;
            }
        }

        self.command_exchange(CommandCode::SET_FE_REG, &params, 1)
            .await?;
        Ok(params.len())
    }

    /// Read signal quality for `band`
    pub async fn read_tuner_status(&mut self, band: Band) -> Result<TunerStatus> {
        let response = self
            .command_exchange(CommandCode::READ_TUNER_STATUS, &[band.to_triplet()], 2)
            .await?;
        TunerStatus::from_response(band, &response)
    }
}
