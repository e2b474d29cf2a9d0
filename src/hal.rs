//! Hardware Abstraction Layer
//!
//! Thin wrappers over the `embedded-hal` traits the driver is built on.
//! This module isolates the bus, pin and time plumbing from the protocol
//! so the driver runs on any HAL and on the host.

pub mod gpio;
pub mod i2c;
pub mod timer;
