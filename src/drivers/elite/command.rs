//! Command exchange
//!
//! Every high-level operation funnels through [`Elite::command_exchange`]:
//! one Mode4 write of the command word plus parameters (checksum on) to the
//! command address, then, if a response is wanted, one Mode4 read from the
//! response address.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use super::Elite;
use crate::config::{COMMAND_READ_ADDRESS, COMMAND_WRITE_ADDRESS, MAX_COMMAND_PARAMS};
use crate::error::{Error, Result};
use crate::hal::timer::Clock;
use crate::protocol::{FrameMode, Units};
use crate::types::CommandCode;

/// Command word plus parameters, 3 bytes each
pub type CommandPayload = Vec<u8, { 3 * (MAX_COMMAND_PARAMS + 1) }>;

/// Lay out the command word and parameters
///
/// The command word is `[code >> 4, (code & 0x0F) << 4, (params + 1) & 0x1F]`;
/// the count includes the command word itself.
pub fn command_payload(code: CommandCode, params: &[[u8; 3]]) -> Result<CommandPayload> {
    if params.len() > MAX_COMMAND_PARAMS {
        return Err(Error::TooManyParameters(params.len()));
    }

    let mut payload = CommandPayload::new();
    // Capacity covers MAX_COMMAND_PARAMS + 1 words
    let overflow = |()| Error::TooManyParameters(params.len());
    #[allow(clippy::cast_possible_truncation)]
    let count = ((params.len() + 1) & 0x1F) as u8;
    payload
        .extend_from_slice(&[code.high_nibble(), code.low_nibble(), count])
        .map_err(overflow)?;
    for param in params {
        payload.extend_from_slice(param).map_err(overflow)?;
    }
    Ok(payload)
}

impl<I2C, RST, D, C> Elite<'_, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Write a command and optionally read its response
    ///
    /// With `receive_units == 0` no read is issued and the result is empty.
    /// Otherwise the decoded Mode4 response is returned, header triplet
    /// first.
    pub async fn command_exchange(
        &mut self,
        code: CommandCode,
        params: &[[u8; 3]],
        receive_units: usize,
    ) -> Result<Units> {
        let payload = command_payload(code, params)?;
        trace!("command {:?}: {} params", code, params.len());

        self.direct_write(
            COMMAND_WRITE_ADDRESS,
            &payload,
            params.len() + 1,
            FrameMode::Mode4,
            true,
        )
        .await?;

        if receive_units == 0 {
            return Ok(Units::new());
        }

        self.direct_read(COMMAND_READ_ADDRESS, receive_units, FrameMode::Mode4)
            .await
    }
}
