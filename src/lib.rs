//! Elite Tuner Driver Library
//!
//! Command/control driver for the Elite radio tuner IC. The chip sits on a
//! two-wire (I2C) bus with a separate active-low reset line. The driver
//! brings it out of reset, downloads the boot image and then talks to it with
//! framed command/parameter/response packets to select bands, tune, load
//! calibration coefficients and read signal-quality telemetry.
//!
//! # Architecture
//!
//! The library is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  HIGH-LEVEL OPERATIONS                       │
//! │  startup │ change band/freq │ FE registers │ coefficients   │
//! ├─────────────────────────────────────────────────────────────┤
//! │          COMMAND DISPATCH  +  READINESS POLLING              │
//! │   write command + params, read response │ busy/ready loop   │
//! ├─────────────────────────────────────────────────────────────┤
//! │          FRAMING CODEC  (pure)  │  BOOT SEQUENCER            │
//! │   Mode1..Mode4 headers, checksums │ reset + image download   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    TRANSPORT / HAL                           │
//! │    I2C frames (embedded-hal-async) │ reset pin │ time        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **HAL-agnostic**: the driver is generic over `embedded-hal` traits
//! - **Functional core, imperative shell**: framing and the readiness state
//!   machine are pure; only the driver performs I/O
//! - **Single owner**: the decoded status flags live in one driver instance
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Transport adapter, reset line and time source.
pub mod hal;

/// Peripheral Drivers
///
/// The Elite tuner driver.
pub mod drivers;

/// Frame encoding and decoding
///
/// The four addressing modes and their checksum arithmetic.
pub mod protocol;

/// Driver error type
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Static chip tables embedded at build time
pub mod tables;

pub use drivers::elite::Elite;
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::drivers::elite::{Elite, PollState, ReadinessPoller};
    pub use crate::error::{Error, Result};
    pub use crate::hal::timer::Clock;
    pub use crate::tables::ChipTables;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal_async::delay::DelayNs;
    pub use embedded_hal_async::i2c::I2c;

    #[cfg(feature = "embedded")]
    pub use crate::hal::timer::EmbassyClock;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Delay, Duration, Instant, Timer};

    // Logging
    #[cfg(feature = "defmt")]
    pub use defmt::{debug, error, info, trace, warn};
}
