//! Beamformer coefficient loading
//!
//! Coefficient records are routed by target address. DMA memory takes one
//! word per `WRITE_DMA_MEM` exchange with the address incremented per
//! word; register memory takes up to seven words per `WRITE_MEM`
//! exchange, every batch of a record addressed at the record's start.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use super::Elite;
use crate::config::MAX_MEM_WORDS_PER_WRITE;
use crate::error::{Error, Result};
use crate::hal::timer::Clock;
use crate::protocol::AddressTriplet;
use crate::tables::{Record, Records};
use crate::types::CommandCode;

/// Chip memory region a coefficient record lands in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryRegion {
    /// `0x000000..=0x019FFF` and `0x01C000..=0x01FFFF`
    Dma,
    /// `0x01A000..=0x01BFFF`
    Register,
}

impl MemoryRegion {
    /// Region containing `addr`, if any
    #[must_use]
    pub const fn classify(addr: u32) -> Option<Self> {
        match addr {
            0x00_0000..=0x01_9FFF | 0x01_C000..=0x01_FFFF => Some(Self::Dma),
            0x01_A000..=0x01_BFFF => Some(Self::Register),
            _ => None,
        }
    }
}

impl<I2C, RST, D, C> Elite<'_, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Load a coefficient table, returning the number of words written
    ///
    /// See [`crate::tables`] for the record layout. Every word is written
    /// exactly once.
    pub async fn write_beamformer_coefficients(&mut self, table: &[u8]) -> Result<usize> {
        let mut words = 0;

        for record in Records::coefficients(table) {
            let record =
                record.map_err(|t| Error::CoefficientTableTruncated { offset: t.offset })?;
            match Self::record_region(&record)? {
                MemoryRegion::Dma => self.write_dma_record(&record).await?,
                MemoryRegion::Register => self.write_mem_record(&record).await?,
            }
            words += record.word_count;
        }

        debug!("coefficients loaded: {} words", words);
        Ok(words)
    }

    /// Region holding every word of `record`
    ///
    /// The first and last word must fall in the same region.
    fn record_region(record: &Record<'_>) -> Result<MemoryRegion> {
        let first = record.address.as_u32();
        #[allow(clippy::cast_possible_truncation)]
        let last = first + record.word_count.saturating_sub(1) as u32;

        let region =
            MemoryRegion::classify(first).ok_or(Error::CoefficientAddressOutOfRange(first))?;
        if MemoryRegion::classify(last) != Some(region) {
            warn!("coefficient record at {} runs out of its region", first);
            return Err(Error::CoefficientAddressOutOfRange(last));
        }
        Ok(region)
    }

    async fn write_dma_record(&mut self, record: &Record<'_>) -> Result<()> {
        let base = record.address.as_u32();

        for (i, word) in (0u32..).zip(record.payload.chunks_exact(3)) {
            let addr = AddressTriplet::from_u32(base.wrapping_add(i) & 0x00FF_FFFF);
            let params = [addr.bytes(), [word[0], word[1], word[2]]];
            self.command_exchange(CommandCode::WRITE_DMA_MEM, &params, 1)
                .await?;
        }
        Ok(())
    }

    async fn write_mem_record(&mut self, record: &Record<'_>) -> Result<()> {
        for batch in record.payload.chunks(3 * MAX_MEM_WORDS_PER_WRITE) {
            let overflow = |_| Error::TooManyParameters(batch.len() / 3 + 1);
            let mut params: Vec<[u8; 3], { MAX_MEM_WORDS_PER_WRITE + 1 }> = Vec::new();
            params.push(record.address.bytes()).map_err(overflow)?;
            for word in batch.chunks_exact(3) {
                params.push([word[0], word[1], word[2]]).map_err(overflow)?;
            }
            self.command_exchange(CommandCode::WRITE_MEM, &params, 1)
                .await?;
        }
        Ok(())
    }
}
