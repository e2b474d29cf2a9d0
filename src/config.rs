//! Driver configuration and chip constants
//!
//! Compile-time constants for the Elite tuner's bus protocol and timing,
//! plus [`EliteConfig`], the runtime knobs handed to the driver.

use crate::protocol::AddressTriplet;

/// Default 7-bit I2C address of the tuner
pub const ELITE_I2C_ADDR: u8 = 0x61;

/// Alternate I2C address (address-select pin strapped high)
pub const ELITE_I2C_ADDR_ALT: u8 = 0x64;

/// Target address for command frames
pub const COMMAND_WRITE_ADDRESS: AddressTriplet = AddressTriplet::new([0x01, 0x90, 0x00]);

/// Target address for command responses
pub const COMMAND_READ_ADDRESS: AddressTriplet = AddressTriplet::new([0x01, 0x90, 0xEB]);

/// Address probed after the boot image download
pub const LIVENESS_ADDRESS: AddressTriplet = AddressTriplet::new([0x01, 0x90, 0xEB]);

/// Word read back from [`LIVENESS_ADDRESS`] by a running chip
pub const LIVENESS_SIGNATURE: [u8; 4] = [0xAF, 0xFE, 0x42, 0x00];

/// Minimum time the reset line is held low
pub const RESET_HOLD_MS: u32 = 300;

/// Settling time between boot download and the liveness probe
pub const BOOT_SETTLE_MS: u32 = 10;

/// Delay between two readiness probes
pub const POLL_INTERVAL_MS: u32 = 10;

/// Readiness budget after the startup command
pub const STARTUP_READY_TIMEOUT_MS: u32 = 250;

/// Readiness budget after band/frequency changes
pub const COMMAND_READY_TIMEOUT_MS: u32 = 1000;

/// Bytes fetched by every Mode4 read
pub const MODE4_READ_LEN: usize = 40;

/// Largest frame the driver ever builds (255-word boot chunk plus checksum)
pub const MAX_FRAME_LEN: usize = 3 + 255 * 4 + 4;

/// Largest response the driver ever reads
pub const MAX_READ_LEN: usize = MODE4_READ_LEN;

/// Parameter count field is five bits wide and includes the command word
pub const MAX_COMMAND_PARAMS: usize = 0x1F - 1;

/// Words per register-memory write exchange
pub const MAX_MEM_WORDS_PER_WRITE: usize = 7;

/// Bus turnaround between the read header and the data read (Mode1/Mode4)
pub const SHORT_TURNAROUND_US: u32 = 4;

/// Bus turnaround between the read header and the data read (Mode2/Mode3)
pub const LONG_TURNAROUND_US: u32 = 50;

/// Runtime driver configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EliteConfig {
    /// 7-bit bus address
    pub i2c_address: u8,
    /// Reset low time
    pub reset_hold_ms: u32,
    /// Wait after boot download before probing
    pub boot_settle_ms: u32,
    /// Readiness probe interval
    pub poll_interval_ms: u32,
    /// Readiness budget after `startup`
    pub startup_timeout_ms: u32,
    /// Readiness budget after `change_band` / `change_frequency`
    pub command_timeout_ms: u32,
}

impl EliteConfig {
    /// Configuration with the documented chip timings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            i2c_address: ELITE_I2C_ADDR,
            reset_hold_ms: RESET_HOLD_MS,
            boot_settle_ms: BOOT_SETTLE_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            startup_timeout_ms: STARTUP_READY_TIMEOUT_MS,
            command_timeout_ms: COMMAND_READY_TIMEOUT_MS,
        }
    }

    /// Use another bus address
    #[must_use]
    pub const fn with_address(mut self, addr: u8) -> Self {
        self.i2c_address = addr & 0x7F;
        self
    }

    /// Override the startup readiness budget
    #[must_use]
    pub const fn with_startup_timeout_ms(mut self, ms: u32) -> Self {
        self.startup_timeout_ms = ms;
        self
    }

    /// Override the band/frequency readiness budget
    #[must_use]
    pub const fn with_command_timeout_ms(mut self, ms: u32) -> Self {
        self.command_timeout_ms = ms;
        self
    }

    /// Override the readiness probe interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }
}

impl Default for EliteConfig {
    fn default() -> Self {
        Self::new()
    }
}
