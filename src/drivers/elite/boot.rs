//! Boot image download
//!
//! Streams the boot image into chip memory one record at a time with Mode3
//! writes and no checksum trailer. A failed chunk aborts the download.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::Elite;
use crate::error::{Error, Result};
use crate::hal::timer::Clock;
use crate::protocol::{self, FrameMode};
use crate::tables::Records;

impl<I2C, RST, D, C> Elite<'_, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Download the boot image, returning the number of records written
    ///
    /// Expects the chip to have just left reset.
    pub async fn download_boot_image(&mut self) -> Result<usize> {
        let image = self.tables.boot_image;
        let mut written = 0;

        for record in Records::boot_image(image) {
            let record = record.map_err(|t| Error::BootImageTruncated { offset: t.offset })?;

            let frame = protocol::encode_write(
                FrameMode::Mode3,
                record.address,
                record.payload,
                record.word_count,
                false,
            )?;

            self.bus.write_frame(&frame).await.map_err(|e| match e {
                Error::BusTransferFailed(kind) => Error::BootTransferFailed {
                    offset: record.offset,
                    kind,
                },
                other => other,
            })?;
            written += 1;
        }

        info!("boot image downloaded: {} records, {} bytes", written, image.len());
        Ok(written)
    }
}
