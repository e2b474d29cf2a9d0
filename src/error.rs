//! Driver error type
//!
//! Bus errors are reduced to [`embedded_hal::i2c::ErrorKind`] so the error
//! does not carry the HAL's type parameters.

use core::fmt;

use embedded_hal::i2c::ErrorKind;

use crate::types::Band;

/// Driver result
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while talking to the tuner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Raw mode selector outside Mode1..Mode4
    UnsupportedMode(u8),
    /// Underlying bus write or read failed
    BusTransferFailed(ErrorKind),
    /// Reset line could not be driven
    ResetLineFailed,
    /// A boot image chunk could not be written
    BootTransferFailed {
        /// Offset of the failing entry in the boot image
        offset: usize,
        /// Bus error reported by the transport
        kind: ErrorKind,
    },
    /// Boot image entry runs past the end of the table
    BootImageTruncated {
        /// Offset of the truncated entry
        offset: usize,
    },
    /// Liveness probe after boot returned something other than the signature
    InitializationFailed([u8; 4]),
    /// Sequence-change flag stayed set past the readiness budget
    ReadinessTimeout {
        /// Time spent polling
        elapsed_ms: u64,
    },
    /// Response shorter than its decode rule requires
    ShortResponse {
        /// Bytes required
        expected: usize,
        /// Bytes received
        actual: usize,
    },
    /// Payload shorter than the requested unit count
    PayloadTooShort {
        /// Bytes required
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Encoded frame would not fit the frame buffer
    FrameOverflow {
        /// Length the frame would have had
        len: usize,
    },
    /// More command parameters than the 5-bit count field allows
    TooManyParameters(usize),
    /// Frequency does not fit the 24-bit parameter field
    FrequencyOutOfRange(u32),
    /// Front-end register index past the end of the band table
    RegisterIndexOutOfRange {
        /// Band whose table was indexed
        band: Band,
        /// Offending index
        index: usize,
    },
    /// Coefficient record targets an address outside the chip memory map
    CoefficientAddressOutOfRange(u32),
    /// Coefficient record runs past the end of the table
    CoefficientTableTruncated {
        /// Offset of the truncated record
        offset: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMode(mode) => write!(f, "unsupported frame mode {mode}"),
            Self::BusTransferFailed(kind) => write!(f, "bus transfer failed: {kind}"),
            Self::ResetLineFailed => write!(f, "reset line could not be driven"),
            Self::BootTransferFailed { offset, kind } => {
                write!(f, "boot chunk at offset {offset} failed: {kind}")
            }
            Self::BootImageTruncated { offset } => {
                write!(f, "boot image truncated at offset {offset}")
            }
            Self::InitializationFailed(status) => write!(
                f,
                "initialize failed: status={:02x}{:02x}{:02x}{:02x}",
                status[0], status[1], status[2], status[3]
            ),
            Self::ReadinessTimeout { elapsed_ms } => {
                write!(f, "chip not ready after {elapsed_ms} ms")
            }
            Self::ShortResponse { expected, actual } => {
                write!(f, "response too short: expected {expected} bytes, got {actual}")
            }
            Self::PayloadTooShort { expected, actual } => {
                write!(f, "payload too short: expected {expected} bytes, got {actual}")
            }
            Self::FrameOverflow { len } => write!(f, "frame of {len} bytes exceeds buffer"),
            Self::TooManyParameters(count) => write!(f, "{count} command parameters exceed limit"),
            Self::FrequencyOutOfRange(khz) => write!(f, "frequency {khz} kHz out of range"),
            Self::RegisterIndexOutOfRange { band, index } => {
                write!(f, "front-end register {index} missing from {band:?} table")
            }
            Self::CoefficientAddressOutOfRange(addr) => {
                write!(f, "coefficient address {addr:#08x} outside memory map")
            }
            Self::CoefficientTableTruncated { offset } => {
                write!(f, "coefficient table truncated at offset {offset}")
            }
        }
    }
}

impl core::error::Error for Error {}
