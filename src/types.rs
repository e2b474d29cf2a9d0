//! Shared types used across the tuner driver
//!
//! Domain types for the command layer: bands, frequencies, command codes
//! and the decoded status words.

use core::fmt;

use crate::error::{Error, Result};

/// Tuning frequency in kHz
///
/// The chip takes frequencies as 24-bit big-endian parameters, so the value
/// is limited to `0..=0xFF_FFFF`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Largest value the 24-bit parameter field can carry
    pub const MAX_KHZ: u32 = 0x00FF_FFFF;

    /// Create a new Frequency from kHz, returns None if out of range
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        if khz <= Self::MAX_KHZ {
            Some(Self(khz))
        } else {
            None
        }
    }

    /// Like [`Frequency::from_khz`] but reporting the failure as an error
    pub const fn try_from_khz(khz: u32) -> Result<Self> {
        match Self::from_khz(khz) {
            Some(freq) => Ok(freq),
            None => Err(Error::FrequencyOutOfRange(khz)),
        }
    }

    /// Get the frequency in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0
    }

    /// Big-endian 24-bit parameter word
    #[must_use]
    pub const fn to_triplet(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} kHz)", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} kHz", self.0);
    }
}

/// Reception band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// FM broadcast
    Fm,
    /// AM, 9 kHz raster (Europe/Japan)
    AmEuJp,
    /// AM, 10 kHz raster (US)
    AmUs,
    /// Weather band
    Wb,
}

impl Band {
    /// Band code sent to the chip
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Fm => 0x01,
            Self::AmEuJp => 0x02,
            Self::AmUs => 0x03,
            Self::Wb => 0x04,
        }
    }

    /// Parse a band code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Fm),
            0x02 => Some(Self::AmEuJp),
            0x03 => Some(Self::AmUs),
            0x04 => Some(Self::Wb),
            _ => None,
        }
    }

    /// Nominal tuning range `(min, max)` in kHz
    #[must_use]
    pub const fn default_range_khz(self) -> (u32, u32) {
        match self {
            Self::Fm => (87_500, 108_000),
            Self::AmEuJp => (522, 1_629),
            Self::AmUs => (530, 1_710),
            Self::Wb => (162_400, 162_550),
        }
    }

    /// Check if the band is an AM band
    #[must_use]
    pub const fn is_am(self) -> bool {
        matches!(self, Self::AmEuJp | Self::AmUs)
    }

    /// Big-endian parameter word carrying the band code
    #[must_use]
    pub const fn to_triplet(self) -> [u8; 3] {
        [0, 0, self.code()]
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Fm => defmt::write!(f, "FM"),
            Self::AmEuJp => defmt::write!(f, "AM(EU/JP)"),
            Self::AmUs => defmt::write!(f, "AM(US)"),
            Self::Wb => defmt::write!(f, "WB"),
        }
    }
}

/// VCO alignment performed by the startup command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlignMode {
    /// Align for 87.5 MHz - 108 MHz
    #[default]
    EuUsa,
    /// Align for 76 MHz - 90 MHz
    Japan,
    /// Only align, no band preset
    AlignOnly,
}

impl AlignMode {
    /// Mode code sent to the chip
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::EuUsa => 0x00,
            Self::Japan => 0x01,
            Self::AlignOnly => 0x02,
        }
    }
}

/// 8-bit command opcode
///
/// Some opcodes share a value (`WRITE_MEM` and `READ_ST_STATUS`), so this
/// is a newtype with associated constants rather than an enum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandCode(u8);

impl CommandCode {
    /// Read DMA memory
    pub const READ_DMA_MEM: Self = Self(0x00);
    /// Write one DMA memory word
    pub const WRITE_DMA_MEM: Self = Self(0x03);
    /// AF check
    pub const AF_CHECK: Self = Self(0x07);
    /// Override front-end registers
    pub const SET_FE_REG: Self = Self(0x09);
    /// AF update start
    pub const AF_START: Self = Self(0x0D);
    /// AF measure
    pub const AF_MEASURE: Self = Self(0x0E);
    /// AF update end
    pub const AF_END: Self = Self(0x0F);
    /// AF switch
    pub const AF_SWITCH: Self = Self(0x10);
    /// Read tuner driver status register
    pub const READ_TDS: Self = Self(0x11);
    /// Read RDS quality
    pub const READ_RDS_QUAL: Self = Self(0x13);
    /// Set seek thresholds
    pub const SET_SEEK_TH: Self = Self(0x14);
    /// Start manual seek
    pub const START_MANUAL_SEEK: Self = Self(0x15);
    /// Start automatic seek
    pub const START_AUTO_SEEK: Self = Self(0x16);
    /// Stop seeking
    pub const SEEK_END: Self = Self(0x17);
    /// Read seek status
    pub const READ_SEEK_STATUS: Self = Self(0x18);
    /// Set digital IF selectivity
    pub const SET_DISS: Self = Self(0x1A);
    /// Read register memory
    pub const READ_MEM: Self = Self(0x1E);
    /// Write register memory
    pub const WRITE_MEM: Self = Self(0x1F);
    /// Read stereo status
    pub const READ_ST_STATUS: Self = Self(0x1F);
    /// Startup with VCO alignment
    pub const STARTUP: Self = Self(0x22);
    /// Change band and tune
    pub const CHANGE_BAND: Self = Self(0x23);
    /// Tune within the current band
    pub const CHANGE_FREQ: Self = Self(0x24);
    /// Read signal quality
    pub const READ_TUNER_STATUS: Self = Self(0x25);

    /// Wrap a raw opcode
    #[must_use]
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Raw opcode
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// First command byte: the opcode's high nibble
    #[must_use]
    pub const fn high_nibble(self) -> u8 {
        (self.0 & 0xF0) >> 4
    }

    /// Second command byte: the opcode's low nibble in the upper half
    #[must_use]
    pub const fn low_nibble(self) -> u8 {
        (self.0 & 0x0F) << 4
    }
}

impl fmt::Debug for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandCode({:#04x})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "cmd {=u8:#x}", self.0);
    }
}

/// Flags decoded from the tuner driver status register
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverState {
    /// Tuner driver busy
    pub busy: bool,
    /// Command collision reported
    pub collision: bool,
    /// Internal sequence change still in progress
    pub sequence_changing: bool,
}

impl DriverState {
    /// Bytes a status response must carry
    pub const RESPONSE_LEN: usize = 6;

    /// Decode from a `READ_TDS` response (header triplet included)
    pub fn from_response(response: &[u8]) -> Result<Self> {
        if response.len() < Self::RESPONSE_LEN {
            return Err(Error::ShortResponse {
                expected: Self::RESPONSE_LEN,
                actual: response.len(),
            });
        }

        Ok(Self {
            busy: response[5] & 0x40 != 0,
            collision: response[4] & 0x01 != 0,
            sequence_changing: response[3] & 0x01 != 0,
        })
    }
}

/// Signal quality reported by `READ_TUNER_STATUS`
///
/// Values are the chip's raw bytes; AM and WB only report field strength
/// and detuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TunerStatus {
    /// Logarithmic field strength indicator
    pub smeter: u8,
    /// Detuning
    pub detuning: u8,
    /// Multipath indicator (FM only)
    pub multipath: Option<u8>,
    /// Adjacent channel indicator (FM only)
    pub adj_channel: Option<u8>,
}

impl TunerStatus {
    /// Bytes an FM status response must carry
    pub const FM_RESPONSE_LEN: usize = 7;

    /// Bytes an AM/WB status response must carry
    pub const AM_RESPONSE_LEN: usize = 5;

    /// Decode a status response for `band` (header triplet included)
    pub fn from_response(band: Band, response: &[u8]) -> Result<Self> {
        let fm = band == Band::Fm;
        let expected = if fm {
            Self::FM_RESPONSE_LEN
        } else {
            Self::AM_RESPONSE_LEN
        };
        if response.len() < expected {
            return Err(Error::ShortResponse {
                expected,
                actual: response.len(),
            });
        }

        Ok(Self {
            smeter: response[3],
            detuning: response[4],
            multipath: fm.then(|| response[5]),
            adj_channel: fm.then(|| response[6]),
        })
    }
}
