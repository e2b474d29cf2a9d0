//! Frame Codec
//!
//! Pure encode/decode of the four addressing modes used to reach chip
//! memory and registers. Every frame starts with a three byte header: the
//! mode selector in the upper nibble of the first byte, bit 0 of the target
//! address in its lowest bit, then the remaining two address bytes.
//!
//! | Mode  | write | read | unit    | checksum       |
//! |-------|-------|------|---------|----------------|
//! | Mode1 | 0x80  | 0x00 | 4 bytes | never          |
//! | Mode2 | 0x90  | 0x10 | 3 bytes | never          |
//! | Mode3 | 0xE0  | 0x60 | 4 bytes | 32-bit sum     |
//! | Mode4 | 0xF0  | 0x70 | 3 bytes | 24-bit sum     |
//!
//! The checksum is a wraparound sum of the big-endian unit values, not a
//! CRC; the chip rejects transfers whose trailer does not match.

use heapless::Vec;

use crate::config::{MAX_FRAME_LEN, MAX_READ_LEN};
use crate::error::{Error, Result};

/// Encoded frame
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Decoded response units
pub type Units = Vec<u8, MAX_READ_LEN>;

/// Three byte target location
///
/// Only bit 0 of the first byte reaches the wire; the rest of that byte is
/// replaced by the mode selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressTriplet([u8; 3]);

impl AddressTriplet {
    /// Create from raw bytes
    #[must_use]
    pub const fn new(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    /// Create from the low 24 bits of a numeric address
    #[must_use]
    pub const fn from_u32(addr: u32) -> Self {
        Self([(addr >> 16) as u8, (addr >> 8) as u8, addr as u8])
    }

    /// Numeric 24-bit address
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        ((self.0[0] as u32) << 16) | ((self.0[1] as u32) << 8) | self.0[2] as u32
    }

    /// Raw bytes
    #[must_use]
    pub const fn bytes(self) -> [u8; 3] {
        self.0
    }

    /// Header triplet with `mode_bits` merged into the first byte
    const fn header(self, mode_bits: u8) -> [u8; 3] {
        [(self.0[0] & 0x01) | mode_bits, self.0[1], self.0[2]]
    }
}

/// Addressing/data mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameMode {
    /// Single 4-byte word, no checksum
    Mode1,
    /// Single 3-byte word, no checksum
    Mode2,
    /// 4-byte words with optional 32-bit checksum
    Mode3,
    /// 3-byte words with optional 24-bit checksum
    Mode4,
}

impl FrameMode {
    /// Header bits for a write frame
    #[must_use]
    pub const fn write_bits(self) -> u8 {
        match self {
            Self::Mode1 => 0x80,
            Self::Mode2 => 0x90,
            Self::Mode3 => 0xE0,
            Self::Mode4 => 0xF0,
        }
    }

    /// Header bits for a read request
    #[must_use]
    pub const fn read_bits(self) -> u8 {
        match self {
            Self::Mode1 => 0x00,
            Self::Mode2 => 0x10,
            Self::Mode3 => 0x60,
            Self::Mode4 => 0x70,
        }
    }

    /// Bytes per data unit
    #[must_use]
    pub const fn unit_width(self) -> usize {
        match self {
            Self::Mode1 | Self::Mode3 => 4,
            Self::Mode2 | Self::Mode4 => 3,
        }
    }

    /// Whether write frames may carry a checksum trailer
    #[must_use]
    pub const fn has_checksum(self) -> bool {
        matches!(self, Self::Mode3 | Self::Mode4)
    }

    /// Mask applied to the checksum accumulator
    const fn checksum_mask(self) -> u32 {
        match self {
            Self::Mode4 => 0x00FF_FFFF,
            _ => 0xFFFF_FFFF,
        }
    }
}

impl TryFrom<u8> for FrameMode {
    type Error = Error;

    /// Modes are numbered 0..=3 on the wire-facing API
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Mode1),
            1 => Ok(Self::Mode2),
            2 => Ok(Self::Mode3),
            3 => Ok(Self::Mode4),
            other => Err(Error::UnsupportedMode(other)),
        }
    }
}

/// Wraparound sum of the first `unit_count` big-endian units of `data`
///
/// Mode3 sums into 32 bits, Mode4 into 24 bits. Modes without a checksum
/// return 0.
#[must_use]
pub fn checksum(mode: FrameMode, data: &[u8], unit_count: usize) -> u32 {
    if !mode.has_checksum() {
        return 0;
    }

    let width = mode.unit_width();
    data.chunks_exact(width)
        .take(unit_count)
        .map(|unit| unit.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
        .fold(0u32, |acc, value| acc.wrapping_add(value) & mode.checksum_mask())
}

/// Build a write frame
///
/// Mode1 and Mode2 always carry exactly one unit and never a checksum;
/// `unit_count` and `append_checksum` are ignored for them.
pub fn encode_write(
    mode: FrameMode,
    address: AddressTriplet,
    data: &[u8],
    unit_count: usize,
    append_checksum: bool,
) -> Result<Frame> {
    let units = match mode {
        FrameMode::Mode1 | FrameMode::Mode2 => 1,
        FrameMode::Mode3 | FrameMode::Mode4 => unit_count,
    };
    let width = mode.unit_width();
    let payload_len = units * width;
    if data.len() < payload_len {
        return Err(Error::PayloadTooShort {
            expected: payload_len,
            actual: data.len(),
        });
    }

    let with_checksum = append_checksum && mode.has_checksum();
    let len = 3 + payload_len + if with_checksum { width } else { 0 };
    let mut frame = Frame::new();
    if len > frame.capacity() {
        return Err(Error::FrameOverflow { len });
    }

    let overflow = |_| Error::FrameOverflow { len };
    frame
        .extend_from_slice(&address.header(mode.write_bits()))
        .map_err(overflow)?;
    frame
        .extend_from_slice(&data[..payload_len])
        .map_err(overflow)?;

    if with_checksum {
        let sum = checksum(mode, data, units).to_be_bytes();
        frame
            .extend_from_slice(&sum[4 - width..])
            .map_err(overflow)?;
    }

    Ok(frame)
}

/// Build a read request header
#[must_use]
pub fn encode_read(mode: FrameMode, address: AddressTriplet) -> [u8; 3] {
    address.header(mode.read_bits())
}

/// Bytes to read back for a request of `unit_count` units
///
/// Mode4 responses are variable length; the chip is always asked for
/// [`MODE4_READ_LEN`](crate::config::MODE4_READ_LEN) bytes, which caps a
/// decodable Mode4 response at 12 units after the header.
pub fn read_len(mode: FrameMode, unit_count: usize) -> Result<usize> {
    match mode {
        FrameMode::Mode1 => Ok(4),
        FrameMode::Mode2 => Ok(3),
        FrameMode::Mode3 => unit_count
            .checked_mul(4)
            .ok_or(Error::FrameOverflow { len: usize::MAX }),
        FrameMode::Mode4 => Ok(crate::config::MODE4_READ_LEN),
    }
}

/// Decode raw response bytes into data units
///
/// Mode1/Mode2/Mode3 return the raw bytes verbatim. Mode4 reads the unit
/// count `k` from the low five bits of the third byte and returns
/// `3 * (k + 1)` bytes: the header triplet itself followed by `k` units.
/// With a 40-byte read window, `k > 12` is reported as
/// [`Error::ShortResponse`].
pub fn decode_read(mode: FrameMode, raw: &[u8]) -> Result<Units> {
    let take = match mode {
        FrameMode::Mode1 => 4,
        FrameMode::Mode2 => 3,
        FrameMode::Mode3 => raw.len() - raw.len() % 4,
        FrameMode::Mode4 => {
            if raw.len() < 3 {
                return Err(Error::ShortResponse {
                    expected: 3,
                    actual: raw.len(),
                });
            }
            3 * (usize::from(raw[2] & 0x1F) + 1)
        }
    };

    if raw.len() < take {
        return Err(Error::ShortResponse {
            expected: take,
            actual: raw.len(),
        });
    }

    Units::from_slice(&raw[..take]).map_err(|()| Error::FrameOverflow { len: take })
}
