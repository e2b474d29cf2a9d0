//! Static chip tables
//!
//! The boot image, per-band front-end register tables and the beamformer
//! coefficient table are opaque vendor data. `build.rs` embeds them from
//! the files named by `ELITE_BOOT_IMAGE`, `ELITE_FE_FM`, `ELITE_FE_AM`,
//! `ELITE_FE_WB` and `ELITE_COEFFICIENTS`; unset variables give empty
//! tables.
//!
//! Layouts:
//! - boot image: `{word_count: u8, address: [u8; 3], payload: [u8; 4 * word_count]}*`
//! - front-end table: `[u8; 3]*` register triplets
//! - coefficients: `{word_count: u8, address: [u8; 3], payload: [u8; 3 * word_count]}*`

use crate::protocol::AddressTriplet;
use crate::types::Band;

/// Boot image embedded at build time
pub const BOOT_IMAGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/boot_image.bin"));

/// FM front-end registers embedded at build time
pub const FE_REGISTERS_FM: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/fe_fm.bin"));

/// AM front-end registers embedded at build time
pub const FE_REGISTERS_AM: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/fe_am.bin"));

/// Weather band front-end registers embedded at build time
pub const FE_REGISTERS_WB: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/fe_wb.bin"));

/// Beamformer coefficients embedded at build time
pub const BEAMFORMER_COEFFICIENTS: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/coefficients.bin"));

/// Table of 3-byte front-end register values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeRegisterTable<'t>(&'t [u8]);

impl<'t> FeRegisterTable<'t> {
    /// Wrap raw table bytes; a trailing partial triplet is ignored
    #[must_use]
    pub const fn new(bytes: &'t [u8]) -> Self {
        Self(bytes)
    }

    /// Number of complete triplets
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len() / 3
    }

    /// Check if the table is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Triplet at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<[u8; 3]> {
        let start = index.checked_mul(3)?;
        let bytes = self.0.get(start..start.checked_add(3)?)?;
        Some([bytes[0], bytes[1], bytes[2]])
    }
}

/// Every static table the driver consumes
#[derive(Clone, Copy, Debug)]
pub struct ChipTables<'t> {
    /// Boot image streamed after reset
    pub boot_image: &'t [u8],
    /// FM front-end registers
    pub fe_fm: FeRegisterTable<'t>,
    /// AM front-end registers (both rasters)
    pub fe_am: FeRegisterTable<'t>,
    /// Weather band front-end registers
    pub fe_wb: FeRegisterTable<'t>,
}

impl ChipTables<'static> {
    /// Tables embedded at build time
    pub const BUILTIN: Self = Self {
        boot_image: BOOT_IMAGE,
        fe_fm: FeRegisterTable::new(FE_REGISTERS_FM),
        fe_am: FeRegisterTable::new(FE_REGISTERS_AM),
        fe_wb: FeRegisterTable::new(FE_REGISTERS_WB),
    };
}

impl<'t> ChipTables<'t> {
    /// Front-end table used for `band`
    #[must_use]
    pub const fn fe_table(&self, band: Band) -> FeRegisterTable<'t> {
        match band {
            Band::Fm => self.fe_fm,
            Band::AmEuJp | Band::AmUs => self.fe_am,
            Band::Wb => self.fe_wb,
        }
    }
}

impl Default for ChipTables<'static> {
    fn default() -> Self {
        Self::BUILTIN
    }
}

/// One `{word_count, address, payload}` record of a variable-length table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'t> {
    /// Byte offset of the record in its table
    pub offset: usize,
    /// Target address
    pub address: AddressTriplet,
    /// Number of payload words
    pub word_count: usize,
    /// Payload, `word_count` words
    pub payload: &'t [u8],
}

impl Record<'_> {
    /// Bytes the record occupies in its table
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }
}

/// Record runs past the end of its table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TruncatedRecord {
    /// Offset of the truncated record
    pub offset: usize,
}

/// Iterator over the records of a boot image or coefficient table
///
/// Stops after the first truncated record.
#[derive(Clone, Debug)]
pub struct Records<'t> {
    data: &'t [u8],
    word_width: usize,
    cursor: usize,
}

impl<'t> Records<'t> {
    /// Walk `data` as records whose words are `word_width` bytes wide
    #[must_use]
    pub const fn new(data: &'t [u8], word_width: usize) -> Self {
        Self {
            data,
            word_width,
            cursor: 0,
        }
    }

    /// Boot image records (4-byte words)
    #[must_use]
    pub const fn boot_image(data: &'t [u8]) -> Self {
        Self::new(data, 4)
    }

    /// Coefficient records (3-byte words)
    #[must_use]
    pub const fn coefficients(data: &'t [u8]) -> Self {
        Self::new(data, 3)
    }
}

impl<'t> Iterator for Records<'t> {
    type Item = Result<Record<'t>, TruncatedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.cursor;
        if offset >= self.data.len() {
            return None;
        }

        let parsed = self.data.get(offset..offset + 4).and_then(|head| {
            let word_count = usize::from(head[0]);
            let end = offset + 4 + word_count * self.word_width;
            let payload = self.data.get(offset + 4..end)?;
            Some(Record {
                offset,
                address: AddressTriplet::new([head[1], head[2], head[3]]),
                word_count,
                payload,
            })
        });

        match parsed {
            Some(record) => {
                self.cursor += record.encoded_len();
                Some(Ok(record))
            }
            None => {
                self.cursor = self.data.len();
                Some(Err(TruncatedRecord { offset }))
            }
        }
    }
}
